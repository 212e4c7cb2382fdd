//! Summary statistics over a [`FilteredView`].
//!
//! Every function is total: an empty view (or a view where the relevant column
//! is entirely null) yields `None` means or an empty sequence, which the UI
//! renders as "No data available".

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use super::filter::FilteredView;
use super::model::{DatasetKind, MovieRecord, NumericField};

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;
pub const DEFAULT_TOP_LIMIT: usize = 10;
pub const DEFAULT_FINANCIAL_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub count: usize,
    pub avg_rating: Option<f64>,
    pub avg_runtime: Option<f64>,
    /// `None` when the dataset has no profit column or every profit is null.
    pub avg_profit: Option<f64>,
}

pub fn summary_metrics(view: &FilteredView<'_>) -> SummaryMetrics {
    let avg_profit = match view.dataset().kind() {
        DatasetKind::Basic => None,
        DatasetKind::WithFinancials => mean(view.records().filter_map(|r| r.financials.profit)),
    };
    SummaryMetrics {
        count: view.len(),
        avg_rating: mean(view.records().filter_map(|r| r.vote_average)),
        avg_runtime: mean(view.records().filter_map(|r| r.runtime)),
        avg_profit,
    }
}

/// Arithmetic mean; `None` over an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Rating histogram
// ---------------------------------------------------------------------------

/// Bucket `[lower, upper)`; the last bucket of a histogram also includes `upper`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width buckets over the observed rating range of the view.
pub fn rating_histogram(view: &FilteredView<'_>, bins: usize) -> Vec<HistogramBucket> {
    let ratings: Vec<f64> = view
        .records()
        .filter_map(|r| r.vote_average)
        .filter(|v| v.is_finite())
        .collect();
    histogram(&ratings, bins)
}

fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBucket> {
    if bins == 0 || values.is_empty() {
        return Vec::new();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut buckets: Vec<HistogramBucket> = (0..bins)
        .map(|i| HistogramBucket {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        buckets[idx].count += 1;
    }
    buckets
}

// ---------------------------------------------------------------------------
// Genre ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Most frequent genre tokens, ties kept in first-seen order.
pub fn top_genres(view: &FilteredView<'_>, limit: usize) -> Vec<GenreCount> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<GenreCount> = Vec::new();

    for genre in view.records().flat_map(|r| r.genres()) {
        match position.get(genre) {
            Some(&i) => counts[i].count += 1,
            None => {
                position.insert(genre, counts.len());
                counts.push(GenreCount {
                    genre: genre.to_string(),
                    count: 1,
                });
            }
        }
    }

    // `sort_by` is stable, which preserves first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

// ---------------------------------------------------------------------------
// Record rankings
// ---------------------------------------------------------------------------

/// Top `limit` records by `field`. Nulls go last in either direction and
/// equal values keep their original order.
pub fn top_by_field<'a>(
    view: &FilteredView<'a>,
    field: NumericField,
    limit: usize,
    ascending: bool,
) -> Vec<&'a MovieRecord> {
    let mut records: Vec<&'a MovieRecord> = view.records().collect();
    records.sort_by(|a, b| match (a.value(field), b.value(field)) {
        (Some(x), Some(y)) if ascending => x.total_cmp(&y),
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    records.truncate(limit);
    records
}

fn top_non_null<'a>(view: &FilteredView<'a>, field: NumericField, limit: usize) -> Vec<&'a MovieRecord> {
    let mut records = top_by_field(view, field, usize::MAX, false);
    records.retain(|r| r.value(field).is_some());
    records.truncate(limit);
    records
}

/// Highest profits, ignoring records without a profit.
pub fn profitable_top<'a>(view: &FilteredView<'a>, limit: usize) -> Vec<&'a MovieRecord> {
    top_non_null(view, NumericField::Profit, limit)
}

/// Largest losses, ignoring records without a loss.
pub fn loss_top<'a>(view: &FilteredView<'a>, limit: usize) -> Vec<&'a MovieRecord> {
    top_non_null(view, NumericField::Loss, limit)
}

// ---------------------------------------------------------------------------
// Per-year series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearAggregate {
    #[default]
    Mean,
    Sum,
    Min,
    Max,
    Median,
}

impl YearAggregate {
    pub const ALL: [YearAggregate; 5] = [
        YearAggregate::Mean,
        YearAggregate::Median,
        YearAggregate::Sum,
        YearAggregate::Min,
        YearAggregate::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            YearAggregate::Mean => "Mean",
            YearAggregate::Sum => "Sum",
            YearAggregate::Min => "Min",
            YearAggregate::Max => "Max",
            YearAggregate::Median => "Median",
        }
    }

    fn apply(self, values: &mut [f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let value = match self {
            YearAggregate::Mean => values.iter().sum::<f64>() / values.len() as f64,
            YearAggregate::Sum => values.iter().sum(),
            YearAggregate::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            YearAggregate::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            YearAggregate::Median => {
                values.sort_by(f64::total_cmp);
                let mid = values.len() / 2;
                if values.len() % 2 == 0 {
                    (values[mid - 1] + values[mid]) / 2.0
                } else {
                    values[mid]
                }
            }
        };
        Some(value)
    }
}

/// `field` aggregated per release year, ascending by year. Years where the
/// field is always null are left out.
pub fn group_by_year(
    view: &FilteredView<'_>,
    field: NumericField,
    agg: YearAggregate,
) -> Vec<(i32, f64)> {
    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for record in view.records() {
        if let (Some(year), Some(value)) = (record.release_year, record.value(field)) {
            groups.entry(year).or_default().push(value);
        }
    }
    groups
        .into_iter()
        .filter_map(|(year, mut values)| agg.apply(&mut values).map(|v| (year, v)))
        .collect()
}

/// Number of visible releases per year, ascending by year.
pub fn counts_per_year(view: &FilteredView<'_>) -> Vec<(i32, usize)> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in view.records().filter_map(|r| r.release_year) {
        *counts.entry(year).or_default() += 1;
    }
    counts.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Scatter series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub color: Option<f64>,
    pub title: String,
}

/// Records where both `x` and `y` are present, in view order.
pub fn scatter(
    view: &FilteredView<'_>,
    x: NumericField,
    y: NumericField,
    color: Option<NumericField>,
) -> Vec<ScatterPoint> {
    view.records()
        .filter_map(|r| {
            Some(ScatterPoint {
                x: r.value(x)?,
                y: r.value(y)?,
                color: color.and_then(|c| r.value(c)),
                title: r.title.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterCriteria, GenreMatch, GenreSelection};
    use crate::data::model::{FinancialColumns, MovieDataset, RawMovie};
    use chrono::NaiveDate;

    fn movie(title: &str, year: i32, rating: f64, genres: &str) -> RawMovie {
        RawMovie {
            title: Some(title.to_string()),
            release_date: NaiveDate::from_ymd_opt(year, 1, 1),
            vote_average: Some(rating),
            genre_names: Some(genres.to_string()),
            ..Default::default()
        }
    }

    fn basic(rows: Vec<RawMovie>) -> MovieDataset {
        MovieDataset::from_raw(rows, FinancialColumns::default())
    }

    fn financial(rows: Vec<RawMovie>) -> MovieDataset {
        MovieDataset::from_raw(
            rows,
            FinancialColumns {
                budget: true,
                revenue: true,
                profit: true,
                loss: true,
            },
        )
    }

    fn titles(records: &[&MovieRecord]) -> Vec<String> {
        records.iter().map(|r| r.title.clone()).collect()
    }

    fn empty_view(ds: &MovieDataset) -> FilteredView<'_> {
        let none = FilterCriteria::new(3000, 3000, 10.0, GenreSelection::All).unwrap();
        filter(ds, &none, GenreMatch::Exact)
    }

    #[test]
    fn summary_over_empty_view() {
        let ds = financial(vec![movie("A", 2000, 5.0, "Horror")]);
        let view = empty_view(&ds);
        let summary = summary_metrics(&view);
        assert_eq!(
            summary,
            SummaryMetrics {
                count: 0,
                avg_rating: None,
                avg_runtime: None,
                avg_profit: None,
            }
        );
    }

    #[test]
    fn summary_means_skip_nulls() {
        let rows = vec![
            RawMovie {
                runtime: Some(90.0),
                profit: Some(10.0),
                ..movie("A", 2000, 6.0, "Horror")
            },
            RawMovie {
                runtime: None,
                profit: None,
                ..movie("B", 2001, 8.0, "Horror")
            },
            RawMovie {
                runtime: Some(0.0),
                profit: Some(30.0),
                ..movie("C", 2002, 7.0, "Horror")
            },
        ];
        let ds = financial(rows);
        let summary = summary_metrics(&FilteredView::all(&ds));
        assert_eq!(summary.count, 3);
        assert_eq!(summary.avg_rating, Some(7.0));
        assert_eq!(summary.avg_runtime, Some(45.0));
        assert_eq!(summary.avg_profit, Some(20.0));
    }

    #[test]
    fn summary_profit_is_none_without_financials() {
        let ds = basic(vec![RawMovie {
            profit: Some(10.0),
            ..movie("A", 2000, 6.0, "Horror")
        }]);
        assert_eq!(summary_metrics(&FilteredView::all(&ds)).avg_profit, None);
    }

    #[test]
    fn histogram_two_bins() {
        let ds = basic(
            [1.0, 1.0, 9.0, 9.0]
                .iter()
                .map(|&r| movie("x", 2000, r, "Horror"))
                .collect(),
        );
        let buckets = rating_histogram(&FilteredView::all(&ds), 2);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].count, 2);
        assert_eq!((buckets[0].lower, buckets[1].upper), (1.0, 9.0));
    }

    #[test]
    fn histogram_degenerate_inputs() {
        let ds = basic(vec![movie("x", 2000, 5.0, "Horror"); 3]);
        let view = FilteredView::all(&ds);
        let buckets = rating_histogram(&view, DEFAULT_HISTOGRAM_BINS);
        assert_eq!(buckets.len(), DEFAULT_HISTOGRAM_BINS);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(buckets[0].lower, 4.5);

        assert!(rating_histogram(&view, 0).is_empty());
        assert!(rating_histogram(&empty_view(&ds), 20).is_empty());
    }

    #[test]
    fn top_genres_descending_with_first_seen_ties() {
        let ds = basic(vec![
            movie("a", 2000, 5.0, "Horror, Thriller"),
            movie("b", 2000, 5.0, "Comedy, Horror"),
            movie("c", 2000, 5.0, "Mystery, Comedy, Thriller"),
            movie("d", 2000, 5.0, "Horror"),
        ]);
        let view = FilteredView::all(&ds);
        let genres = top_genres(&view, 10);
        let got: Vec<(&str, usize)> = genres.iter().map(|g| (g.genre.as_str(), g.count)).collect();
        assert_eq!(
            got,
            [("Horror", 3), ("Thriller", 2), ("Comedy", 2), ("Mystery", 1)]
        );

        let limited = top_genres(&view, 2);
        assert_eq!(limited.len(), 2);
        let total_tokens: usize = view.records().map(|r| r.genres().count()).sum();
        assert!(limited.iter().map(|g| g.count).sum::<usize>() <= total_tokens);
        assert!(top_genres(&empty_view(&ds), 10).is_empty());
    }

    #[test]
    fn top_by_field_is_stable_with_nulls_last() {
        let rows = vec![
            RawMovie {
                popularity: Some(5.0),
                ..movie("five", 2000, 5.0, "Horror")
            },
            RawMovie {
                popularity: None,
                ..movie("null", 2000, 5.0, "Horror")
            },
            RawMovie {
                popularity: Some(9.0),
                ..movie("nine", 2000, 5.0, "Horror")
            },
            RawMovie {
                popularity: Some(5.0),
                ..movie("five-again", 2000, 5.0, "Horror")
            },
        ];
        let ds = basic(rows);
        let view = FilteredView::all(&ds);

        let desc = top_by_field(&view, NumericField::Popularity, 10, false);
        assert_eq!(titles(&desc), ["nine", "five", "five-again", "null"]);

        let asc = top_by_field(&view, NumericField::Popularity, 3, true);
        assert_eq!(titles(&asc), ["five", "five-again", "nine"]);
    }

    #[test]
    fn profitable_top_skips_null_profit() {
        let ds = financial(vec![
            RawMovie {
                profit: None,
                ..movie("none", 2000, 5.0, "Horror")
            },
            RawMovie {
                profit: Some(100.0),
                ..movie("hundred", 2000, 5.0, "Horror")
            },
        ]);
        let top = profitable_top(&FilteredView::all(&ds), DEFAULT_FINANCIAL_LIMIT);
        assert_eq!(titles(&top), ["hundred"]);
        assert_eq!(top[0].financials.profit, Some(100.0));
    }

    #[test]
    fn loss_top_orders_by_loss() {
        let ds = financial(vec![
            RawMovie {
                loss: Some(10.0),
                ..movie("small", 2000, 5.0, "Horror")
            },
            RawMovie {
                loss: None,
                ..movie("none", 2000, 5.0, "Horror")
            },
            RawMovie {
                loss: Some(70.0),
                ..movie("big", 2000, 5.0, "Horror")
            },
        ]);
        let top = loss_top(&FilteredView::all(&ds), 1);
        assert_eq!(titles(&top), ["big"]);
    }

    #[test]
    fn group_by_year_sorted_and_omits_null_years() {
        let ds = basic(vec![
            RawMovie {
                runtime: Some(100.0),
                ..movie("a", 2012, 5.0, "Horror")
            },
            RawMovie {
                runtime: Some(80.0),
                ..movie("b", 2003, 5.0, "Horror")
            },
            RawMovie {
                runtime: Some(120.0),
                ..movie("c", 2012, 5.0, "Horror")
            },
            RawMovie {
                runtime: None,
                ..movie("d", 2007, 5.0, "Horror")
            },
        ]);
        let view = FilteredView::all(&ds);
        let series = group_by_year(&view, NumericField::Runtime, YearAggregate::Mean);
        assert_eq!(series, [(2003, 80.0), (2012, 110.0)]);
        assert!(series.windows(2).all(|w| w[0].0 < w[1].0));

        let max = group_by_year(&view, NumericField::Runtime, YearAggregate::Max);
        assert_eq!(max, [(2003, 80.0), (2012, 120.0)]);
        let median = group_by_year(&view, NumericField::Runtime, YearAggregate::Median);
        assert_eq!(median, [(2003, 80.0), (2012, 110.0)]);
    }

    #[test]
    fn counts_per_year_ascending() {
        let ds = basic(vec![
            movie("a", 2020, 5.0, "Horror"),
            movie("b", 2018, 5.0, "Horror"),
            movie("c", 2020, 5.0, "Horror"),
        ]);
        assert_eq!(
            counts_per_year(&FilteredView::all(&ds)),
            [(2018, 1), (2020, 2)]
        );
        assert!(counts_per_year(&empty_view(&ds)).is_empty());
    }

    #[test]
    fn scatter_needs_both_axes() {
        let ds = basic(vec![
            RawMovie {
                runtime: Some(95.0),
                ..movie("with", 2000, 6.5, "Horror")
            },
            movie("without", 2000, 6.0, "Horror"),
        ]);
        let points = scatter(
            &FilteredView::all(&ds),
            NumericField::Runtime,
            NumericField::VoteAverage,
            None,
        );
        assert_eq!(points.len(), 1);
        assert_eq!((points[0].x, points[0].y), (95.0, 6.5));
        assert_eq!(points[0].title, "with");
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([1.0, 2.0]), Some(1.5));
    }
}
