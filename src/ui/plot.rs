use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{ColorScale, ACCENT};
use crate::data::stats::{GenreCount, HistogramBucket, ScatterPoint};
use crate::ui::panels::no_data;

const CHART_HEIGHT: f32 = 280.0;

/// Number of colour bands a coloured scatter is split into.
const COLOR_BANDS: usize = 8;

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Rating distribution as contiguous bars.
pub fn histogram_chart(ui: &mut Ui, id: &str, buckets: &[HistogramBucket], x_label: &str) {
    if buckets.is_empty() {
        no_data(ui);
        return;
    }
    let bars: Vec<Bar> = buckets
        .iter()
        .map(|b| {
            Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                .width(b.upper - b.lower)
                .name(format!("{:.2} – {:.2}", b.lower, b.upper))
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("Movies")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(ACCENT).name("Movies"));
        });
}

/// Horizontal bars, most common genre on top.
pub fn genre_chart(ui: &mut Ui, genres: &[GenreCount]) {
    if genres.is_empty() {
        no_data(ui);
        return;
    }
    let n = genres.len();
    let labels: Vec<String> = genres.iter().rev().map(|g| g.genre.clone()).collect();
    let bars: Vec<Bar> = genres
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new((n - 1 - i) as f64, g.count as f64)
                .width(0.7)
                .name(&g.genre)
        })
        .collect();

    Plot::new("top_genres")
        .height(CHART_HEIGHT)
        .x_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(ACCENT));
        });
}

// ---------------------------------------------------------------------------
// Scatter plots
// ---------------------------------------------------------------------------

/// Single-colour scatter.
pub fn scatter_chart(ui: &mut Ui, id: &str, points: &[ScatterPoint], axes: (&str, &str)) {
    if points.is_empty() {
        no_data(ui);
        return;
    }
    let series: PlotPoints = points.iter().map(|p| [p.x, p.y]).collect();
    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(axes.0)
        .y_axis_label(axes.1)
        .show(ui, |plot_ui| {
            plot_ui.points(Points::new(series).radius(2.5).color(ACCENT));
        });
}

/// Scatter coloured by each point's `color` value, split into bands so the
/// legend stays readable.
pub fn colored_scatter_chart(
    ui: &mut Ui,
    id: &str,
    points: &[ScatterPoint],
    axes: (&str, &str),
    scale: &ColorScale,
) {
    if points.is_empty() {
        no_data(ui);
        return;
    }
    let bands = color_bands(points, COLOR_BANDS);

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(axes.0)
        .y_axis_label(axes.1)
        .show(ui, |plot_ui| {
            for band in bands {
                let color = band.center.map_or(Color32::GRAY, |c| scale.color_for(c));
                plot_ui.points(
                    Points::new(PlotPoints::new(band.points))
                        .radius(3.0)
                        .color(color)
                        .name(band.label),
                );
            }
        });
}

struct ColorBand {
    label: String,
    center: Option<f64>,
    points: Vec<[f64; 2]>,
}

/// Group points into `n` equal-width bands of their colour value; points
/// without one land in a trailing "n/a" band.
fn color_bands(points: &[ScatterPoint], n: usize) -> Vec<ColorBand> {
    let values = points.iter().filter_map(|p| p.color);
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let width = if hi > lo { (hi - lo) / n as f64 } else { 1.0 };

    let mut bands: Vec<ColorBand> = (0..n)
        .map(|i| {
            let from = lo + width * i as f64;
            ColorBand {
                label: format!("{:.1} – {:.1}", from, from + width),
                center: Some(from + width / 2.0),
                points: Vec::new(),
            }
        })
        .collect();
    let mut missing = ColorBand {
        label: "n/a".to_string(),
        center: None,
        points: Vec::new(),
    };

    for p in points {
        match p.color {
            Some(c) if n > 0 => {
                let idx = (((c - lo) / width) as usize).min(n - 1);
                bands[idx].points.push([p.x, p.y]);
            }
            _ => missing.points.push([p.x, p.y]),
        }
    }

    bands.push(missing);
    bands.retain(|b| !b.points.is_empty());
    bands
}

// ---------------------------------------------------------------------------
// Line charts
// ---------------------------------------------------------------------------

/// Per-year series as a line with markers.
pub fn year_line_chart(ui: &mut Ui, id: &str, series: &[(i32, f64)], y_label: &str) {
    if series.is_empty() {
        no_data(ui);
        return;
    }
    let coords: Vec<[f64; 2]> = series
        .iter()
        .map(|&(year, v)| [f64::from(year), v])
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::new(coords.clone())).color(ACCENT).width(2.0));
            plot_ui.points(Points::new(PlotPoints::new(coords)).radius(2.5).color(ACCENT));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(color: Option<f64>) -> ScatterPoint {
        ScatterPoint {
            x: 1.0,
            y: 2.0,
            color,
            title: String::new(),
        }
    }

    #[test]
    fn bands_cover_every_point() {
        let points = vec![point(Some(1.0)), point(Some(9.0)), point(None), point(Some(5.0))];
        let bands = color_bands(&points, 4);
        assert_eq!(bands.iter().map(|b| b.points.len()).sum::<usize>(), 4);
        assert_eq!(bands.last().map(|b| b.label.as_str()), Some("n/a"));
    }

    #[test]
    fn single_colour_value_lands_in_first_band() {
        let points = vec![point(Some(7.0)), point(Some(7.0))];
        let bands = color_bands(&points, 8);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].points.len(), 2);
    }
}
