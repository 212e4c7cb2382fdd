use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::error::CriteriaError;
use crate::data::filter::{FilterCriteria, GenreMatch, GenreSelection};
use crate::data::model::MovieDataset;
use crate::data::stats::{DEFAULT_FINANCIAL_LIMIT, DEFAULT_HISTOGRAM_BINS, DEFAULT_TOP_LIMIT};

/// Dashboard settings read from a TOML file. Every key is optional.
///
/// ```toml
/// data_path = "horror_movies_limpo.csv"
/// genre_match = "exact"
///
/// [defaults]
/// year_min = 2010
/// year_max = 2022
/// rating_min = 6.0
///
/// [charts]
/// histogram_bins = 20
/// top_limit = 10
/// financial_limit = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub genre_match: GenreMatch,
    pub defaults: FilterDefaults,
    pub charts: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub year_min: i32,
    pub year_max: i32,
    pub rating_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub histogram_bins: usize,
    pub top_limit: usize,
    pub financial_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("horror_movies_limpo.csv"),
            genre_match: GenreMatch::Exact,
            defaults: FilterDefaults::default(),
            charts: ChartConfig::default(),
        }
    }
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            year_min: 2010,
            year_max: 2022,
            rating_min: 6.0,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            top_limit: DEFAULT_TOP_LIMIT,
            financial_limit: DEFAULT_FINANCIAL_LIMIT,
        }
    }
}

impl DashboardConfig {
    /// Read a config file; a missing path yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl FilterDefaults {
    /// Starting criteria for `dataset`: the configured year window clamped to
    /// the observed years, and the rating floor clamped to `0.0..=10.0`.
    pub fn criteria_for(&self, dataset: &MovieDataset) -> Result<FilterCriteria, CriteriaError> {
        let (lo, hi) = dataset
            .year_bounds()
            .unwrap_or((self.year_min, self.year_max));
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        let year_min = self.year_min.clamp(lo, hi);
        let year_max = self.year_max.clamp(lo, hi);
        let rating_min = if self.rating_min.is_nan() {
            0.0
        } else {
            self.rating_min.clamp(0.0, 10.0)
        };
        FilterCriteria::new(
            year_min.min(year_max),
            year_min.max(year_max),
            rating_min,
            GenreSelection::All,
        )
    }
}
