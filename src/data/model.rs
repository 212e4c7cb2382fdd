use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Separator between labels inside `genre_names` ("Horror, Slasher, Thriller").
pub const GENRE_DELIMITER: &str = ", ";

/// Genre option meaning "no genre restriction".
pub const ALL_GENRES: &str = "All";

// ---------------------------------------------------------------------------
// Financials – optional money columns of one row
// ---------------------------------------------------------------------------

/// Monetary fields of a record. Columns the source carried are kept as read;
/// `profit` and `profit_margin` stay `None` on a [`DatasetKind::Basic`] dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Financials {
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    /// Precomputed upstream; never derived here.
    pub loss: Option<f64>,
    /// `profit / revenue * 100`.
    pub profit_margin: Option<f64>,
}

/// Which optional money columns the source actually carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinancialColumns {
    pub budget: bool,
    pub revenue: bool,
    pub profit: bool,
    pub loss: bool,
}

impl FinancialColumns {
    /// Profit is available either from its own column or from budget + revenue.
    pub fn kind(&self) -> DatasetKind {
        if self.profit || (self.budget && self.revenue) {
            DatasetKind::WithFinancials
        } else {
            DatasetKind::Basic
        }
    }
}

/// Capability detected once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Basic,
    WithFinancials,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Basic => write!(f, "basic"),
            DatasetKind::WithFinancials => write!(f, "with financials"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawMovie – one parsed source row, before derivation
// ---------------------------------------------------------------------------

/// A row as read by a loader. Money fields stay `None` for absent columns.
#[derive(Debug, Clone, Default)]
pub struct RawMovie {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub popularity: Option<f64>,
    pub runtime: Option<f64>,
    pub genre_names: Option<String>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    pub loss: Option<f64>,
}

// ---------------------------------------------------------------------------
// MovieRecord – one row of the dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub release_year: Option<i32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub popularity: Option<f64>,
    pub runtime: Option<f64>,
    pub genre_names: Option<String>,
    pub financials: Financials,
}

impl MovieRecord {
    fn derive(raw: RawMovie, columns: &FinancialColumns) -> Self {
        let profit = match columns.kind() {
            DatasetKind::Basic => None,
            DatasetKind::WithFinancials if columns.profit => raw.profit,
            DatasetKind::WithFinancials => match (raw.revenue, raw.budget) {
                (Some(revenue), Some(budget)) => Some(revenue - budget),
                _ => None,
            },
        };
        let profit_margin = match (profit, raw.revenue) {
            (Some(p), Some(r)) if r != 0.0 => Some(p / r * 100.0),
            _ => None,
        };
        let financials = Financials {
            budget: raw.budget,
            revenue: raw.revenue,
            profit,
            loss: raw.loss,
            profit_margin,
        };

        MovieRecord {
            title: raw.title.unwrap_or_default(),
            release_year: raw.release_date.map(|d| d.year()),
            release_date: raw.release_date,
            vote_average: raw.vote_average,
            vote_count: raw.vote_count,
            popularity: raw.popularity,
            runtime: raw.runtime,
            genre_names: raw.genre_names,
            financials,
        }
    }

    /// Genre tokens of this record, in source order. Empty when `genre_names` is null.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre_names
            .as_deref()
            .into_iter()
            .flat_map(|g| g.split(GENRE_DELIMITER))
            .filter(|g| !g.is_empty())
    }

    /// Read a numeric column by name.
    pub fn value(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::VoteAverage => self.vote_average,
            NumericField::Popularity => self.popularity,
            NumericField::Runtime => self.runtime,
            NumericField::Budget => self.financials.budget,
            NumericField::Revenue => self.financials.revenue,
            NumericField::Profit => self.financials.profit,
            NumericField::Loss => self.financials.loss,
            NumericField::ProfitMargin => self.financials.profit_margin,
        }
    }
}

/// Numeric columns usable for ranking, grouping and scatter plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    VoteAverage,
    Popularity,
    Runtime,
    Budget,
    Revenue,
    Profit,
    Loss,
    ProfitMargin,
}

impl NumericField {
    pub fn label(self) -> &'static str {
        match self {
            NumericField::VoteAverage => "Rating",
            NumericField::Popularity => "Popularity",
            NumericField::Runtime => "Runtime (min)",
            NumericField::Budget => "Budget",
            NumericField::Revenue => "Revenue",
            NumericField::Profit => "Profit",
            NumericField::Loss => "Loss",
            NumericField::ProfitMargin => "Profit margin (%)",
        }
    }
}

// ---------------------------------------------------------------------------
// MovieDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full dataset. Immutable once built; shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct MovieDataset {
    records: Vec<MovieRecord>,
    kind: DatasetKind,
    genre_options: Vec<String>,
}

impl MovieDataset {
    /// Derive computed columns and the genre option list from parsed rows.
    pub fn from_raw(rows: Vec<RawMovie>, columns: FinancialColumns) -> Self {
        let records: Vec<MovieRecord> = rows
            .into_iter()
            .map(|raw| MovieRecord::derive(raw, &columns))
            .collect();

        let distinct: BTreeSet<&str> = records.iter().flat_map(|r| r.genres()).collect();
        let genre_options = std::iter::once(ALL_GENRES.to_string())
            .chain(distinct.into_iter().map(str::to_string))
            .collect();

        MovieDataset {
            records,
            kind: columns.kind(),
            genre_options,
        }
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// "All" followed by every distinct genre token, sorted.
    pub fn genre_options(&self) -> &[String] {
        &self.genre_options
    }

    /// Smallest and largest non-null release year.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.records.iter().filter_map(|r| r.release_year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
