use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

/// Accent used for single-series charts.
pub const ACCENT: Color32 = Color32::from_rgb(0x99, 0x00, 0x00);

/// Stops of the continuous rating scale, light to dark.
const RATING_STOPS: [(u8, u8, u8); 4] = [
    (0xFF, 0xCC, 0xCB),
    (0xFF, 0x66, 0x66),
    (0xFF, 0x00, 0x00),
    (0x99, 0x00, 0x00),
];

// ---------------------------------------------------------------------------
// Continuous colour scale: numeric value → Color32
// ---------------------------------------------------------------------------

/// Maps a value in `[min, max]` onto the rating gradient, interpolating in
/// linear RGB.
#[derive(Debug, Clone)]
pub struct ColorScale {
    min: f64,
    max: f64,
    stops: Vec<LinSrgb>,
}

impl ColorScale {
    pub fn rating() -> Self {
        Self::new(0.0, 10.0)
    }

    pub fn new(min: f64, max: f64) -> Self {
        let stops = RATING_STOPS
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        ColorScale { min, max, stops }
    }

    /// Scale spanning the observed values; falls back to `0..=10` when empty.
    pub fn fitted(values: impl IntoIterator<Item = f64>) -> Self {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if lo.is_finite() && hi.is_finite() {
            Self::new(lo, hi)
        } else {
            Self::rating()
        }
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let span = self.max - self.min;
        let t = if span.abs() < f64::EPSILON || !value.is_finite() {
            0.0
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0) as f32
        };
        let segments = (self.stops.len() - 1) as f32;
        let pos = t * segments;
        let idx = (pos.floor() as usize).min(self.stops.len() - 2);
        let mixed = self.stops[idx].mix(self.stops[idx + 1], pos - idx as f32);
        let rgb = Srgb::<u8>::from_linear(mixed);
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }
}
