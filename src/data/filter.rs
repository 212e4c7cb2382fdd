use serde::{Deserialize, Serialize};

use super::error::CriteriaError;
use super::model::{MovieDataset, MovieRecord, ALL_GENRES};

// ---------------------------------------------------------------------------
// Filter predicate: year range, rating floor, genre
// ---------------------------------------------------------------------------

/// Genre restriction chosen in the genre selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreSelection {
    #[default]
    All,
    Named(String),
}

impl GenreSelection {
    /// Map a selector option back to a selection; `"All"` means no restriction.
    pub fn from_option(option: &str) -> Self {
        if option == ALL_GENRES {
            GenreSelection::All
        } else {
            GenreSelection::Named(option.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GenreSelection::All => ALL_GENRES,
            GenreSelection::Named(g) => g,
        }
    }
}

/// How a named genre is compared against `genre_names`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenreMatch {
    /// A delimiter-split token must equal the genre ("War" does not match "War Comedy").
    #[default]
    Exact,
    /// Case-sensitive substring test over the whole `genre_names` text.
    Substring,
}

/// User-chosen predicates. Construct with [`FilterCriteria::new`] to keep
/// `year_min <= year_max` and `rating_min` within `0.0..=10.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    year_min: i32,
    year_max: i32,
    rating_min: f64,
    genre: GenreSelection,
}

impl FilterCriteria {
    pub fn new(
        year_min: i32,
        year_max: i32,
        rating_min: f64,
        genre: GenreSelection,
    ) -> Result<Self, CriteriaError> {
        if year_min > year_max {
            return Err(CriteriaError::InvertedYears {
                min: year_min,
                max: year_max,
            });
        }
        if !(0.0..=10.0).contains(&rating_min) {
            return Err(CriteriaError::RatingOutOfRange(rating_min));
        }
        Ok(FilterCriteria {
            year_min,
            year_max,
            rating_min,
            genre,
        })
    }

    pub fn year_min(&self) -> i32 {
        self.year_min
    }

    pub fn year_max(&self) -> i32 {
        self.year_max
    }

    pub fn rating_min(&self) -> f64 {
        self.rating_min
    }

    pub fn genre(&self) -> &GenreSelection {
        &self.genre
    }

    /// Whether a single record passes every predicate.
    pub fn matches(&self, record: &MovieRecord, mode: GenreMatch) -> bool {
        let Some(year) = record.release_year else {
            return false;
        };
        if year < self.year_min || year > self.year_max {
            return false;
        }
        match record.vote_average {
            Some(rating) if rating >= self.rating_min => {}
            _ => return false,
        }
        match &self.genre {
            GenreSelection::All => true,
            GenreSelection::Named(genre) => match mode {
                GenreMatch::Exact => record.genres().any(|g| g == genre),
                GenreMatch::Substring => record
                    .genre_names
                    .as_deref()
                    .is_some_and(|names| names.contains(genre.as_str())),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView – indices of records passing the criteria
// ---------------------------------------------------------------------------

/// A borrowed subset of a dataset, in original record order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a MovieDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// The unfiltered view.
    #[cfg(test)]
    pub fn all(dataset: &'a MovieDataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from indices computed earlier with [`filter`].
    /// Out-of-range indices are dropped; order is normalised to ascending.
    pub fn from_indices(dataset: &'a MovieDataset, mut indices: Vec<usize>) -> Self {
        indices.retain(|&i| i < dataset.len());
        indices.sort_unstable();
        indices.dedup();
        FilteredView { dataset, indices }
    }

    pub fn dataset(&self) -> &'a MovieDataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a MovieRecord> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// At least one visible record carries a profit value.
    pub fn has_financial_data(&self) -> bool {
        self.records().any(|r| r.financials.profit.is_some())
    }
}

/// Apply `criteria` to the whole dataset. Never fails; an empty view is valid.
pub fn filter<'a>(
    dataset: &'a MovieDataset,
    criteria: &FilterCriteria,
    mode: GenreMatch,
) -> FilteredView<'a> {
    let indices: Vec<usize> = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record, mode))
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "Filter {}..={} rating>={} genre={} kept {}/{}",
        criteria.year_min,
        criteria.year_max,
        criteria.rating_min,
        criteria.genre.label(),
        indices.len(),
        dataset.len()
    );

    FilteredView { dataset, indices }
}
