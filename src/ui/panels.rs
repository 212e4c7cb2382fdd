use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{FilteredView, GenreMatch, GenreSelection};
use crate::data::stats::SummaryMetrics;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("💀 HORROR MOVIES").strong().size(18.0));
    });
    ui.separator();
    ui.heading("Filters");
    ui.add_space(4.0);

    let (lo, hi) = state
        .dataset
        .year_bounds()
        .unwrap_or((state.criteria.year_min(), state.criteria.year_max()));
    let mut year_min = state.criteria.year_min().clamp(lo, hi);
    let mut year_max = state.criteria.year_max().clamp(lo, hi);
    let mut rating_min = state.criteria.rating_min();
    let mut genre = state.criteria.genre().label().to_string();
    let mut genre_match = state.genre_match;
    let options = state.dataset.genre_options().to_vec();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Release year");
            if ui
                .add(egui::Slider::new(&mut year_min, lo..=hi).text("from"))
                .changed()
            {
                year_max = year_max.max(year_min);
            }
            if ui
                .add(egui::Slider::new(&mut year_max, lo..=hi).text("to"))
                .changed()
            {
                year_min = year_min.min(year_max);
            }
            ui.separator();

            ui.strong("Minimum rating");
            ui.add(egui::Slider::new(&mut rating_min, 0.0..=10.0).step_by(0.1));
            ui.separator();

            ui.strong("Genre");
            egui::ComboBox::from_id_salt("genre")
                .selected_text(&genre)
                .show_ui(ui, |ui: &mut Ui| {
                    for option in &options {
                        ui.selectable_value(&mut genre, option.clone(), option);
                    }
                });
            ui.horizontal(|ui: &mut Ui| {
                ui.radio_value(&mut genre_match, GenreMatch::Exact, "Exact");
                ui.radio_value(&mut genre_match, GenreMatch::Substring, "Contains");
            });
        });

    state.set_genre_match(genre_match);
    state.set_criteria(
        year_min,
        year_max,
        rating_min,
        GenreSelection::from_option(&genre),
    );
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} movies loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        ui.separator();
        ui.label(state.cache.source().display().to_string());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

pub fn metrics_row(ui: &mut Ui, view: &FilteredView<'_>, summary: &SummaryMetrics) {
    ui.heading("Key metrics");
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Total movies", summary.count.to_string());
        metric(&mut cols[1], "Average rating", format_rating(summary.avg_rating));
        metric(&mut cols[2], "Average runtime", format_runtime(summary.avg_runtime));
        let profit = if view.has_financial_data() {
            format_millions(summary.avg_profit)
        } else {
            NOT_AVAILABLE.to_string()
        };
        metric(&mut cols[3], "Average profit", profit);
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_rating(v: Option<f64>) -> String {
    v.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.1}"))
}

pub fn format_runtime(v: Option<f64>) -> String {
    v.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.0} min"))
}

pub fn format_millions(v: Option<f64>) -> String {
    v.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("${:.1}M", v / 1e6))
}

/// Whole dollars with thousands separators: `-$1,234,567`.
pub fn format_money(v: Option<f64>) -> String {
    let Some(v) = v else {
        return String::new();
    };
    let digits = format!("{:.0}", v.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if v < 0.0 && digits != "0" { "-" } else { "" };
    format!("{sign}${grouped}")
}

/// Placeholder for charts and tables over an empty selection.
pub const NO_DATA_MESSAGE: &str = "No data available";

pub fn no_data(ui: &mut Ui) {
    ui.label(RichText::new(NO_DATA_MESSAGE).italics().weak());
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open movie data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open(path) {
            log::error!("Failed to load file: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
