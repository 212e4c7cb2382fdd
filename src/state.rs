use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::cache::DatasetCache;
use crate::data::error::DataLoadError;
use crate::data::filter::{filter, FilterCriteria, FilteredView, GenreMatch, GenreSelection};
use crate::data::model::MovieDataset;
use crate::data::stats::YearAggregate;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Central-panel tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Movies,
    Financial,
    Temporal,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Movies, Tab::Financial, Tab::Temporal];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Movies => "Movies",
            Tab::Financial => "Financial",
            Tab::Temporal => "Temporal",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Source of the dataset; replaced by "File → Open…".
    pub cache: DatasetCache,

    /// Loaded dataset, shared with the cache.
    pub dataset: Arc<MovieDataset>,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// How the genre selection is matched.
    pub genre_match: GenreMatch,

    /// Indices of movies passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub tab: Tab,

    /// Aggregate used by the per-year rating and runtime charts.
    pub year_aggregate: YearAggregate,

    pub config: DashboardConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load through `cache` and apply the configured default filters.
    pub fn new(mut cache: DatasetCache, config: DashboardConfig) -> Result<Self, DataLoadError> {
        let dataset = cache.get()?;
        if dataset.is_empty() {
            log::warn!("{} contains no movies", cache.source().display());
        }
        let criteria = initial_criteria(&config, &dataset);
        let mut state = Self {
            cache,
            dataset,
            criteria,
            genre_match: config.genre_match,
            visible_indices: Vec::new(),
            tab: Tab::default(),
            year_aggregate: YearAggregate::default(),
            config,
            status_message: None,
        };
        state.refilter();
        Ok(state)
    }

    /// The current filtered view.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::from_indices(&self.dataset, self.visible_indices.clone())
    }

    /// Recompute `visible_indices` after a criteria change.
    pub fn refilter(&mut self) {
        self.visible_indices = filter(&self.dataset, &self.criteria, self.genre_match)
            .indices()
            .to_vec();
    }

    /// Replace the criteria if valid; otherwise keep the old ones and report.
    pub fn set_criteria(
        &mut self,
        year_min: i32,
        year_max: i32,
        rating_min: f64,
        genre: GenreSelection,
    ) {
        match FilterCriteria::new(year_min, year_max, rating_min, genre) {
            Ok(criteria) => {
                if criteria != self.criteria {
                    self.criteria = criteria;
                    self.status_message = None;
                    self.refilter();
                }
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    pub fn set_genre_match(&mut self, mode: GenreMatch) {
        if mode != self.genre_match {
            self.genre_match = mode;
            self.refilter();
        }
    }

    /// Swap in a dataset from another file. On failure the current one stays.
    pub fn open(&mut self, path: PathBuf) -> Result<(), DataLoadError> {
        let mut cache = DatasetCache::new(path);
        let dataset = cache.get()?;
        log::debug!(
            "Opened {} (source reads: {})",
            cache.source().display(),
            cache.load_count()
        );
        self.criteria = initial_criteria(&self.config, &dataset);
        self.cache = cache;
        self.dataset = dataset;
        self.status_message = None;
        self.refilter();
        Ok(())
    }
}

fn initial_criteria(config: &DashboardConfig, dataset: &MovieDataset) -> FilterCriteria {
    config.defaults.criteria_for(dataset).unwrap_or_else(|e| {
        log::warn!("Ignoring default filters: {e}");
        FilterCriteria::new(i32::MIN, i32::MAX, 0.0, GenreSelection::All)
            .unwrap_or_else(|_| unreachable!("full year range with a zero rating floor"))
    })
}
