/// Data layer: loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MovieDataset (derived year, profit margin)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  read once, share Arc<MovieDataset>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / rating / genre predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  summaries, rankings, per-year series
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
