use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure while reading the movie table. Nothing can be rendered
/// without a dataset, so callers propagate this to the top.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: unparsable release_date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}

/// Rejected filter criteria.
#[derive(Debug, Error, PartialEq)]
pub enum CriteriaError {
    #[error("year range is inverted: {min} > {max}")]
    InvertedYears { min: i32, max: i32 },

    #[error("minimum rating {0} is outside 0.0..=10.0")]
    RatingOutOfRange(f64),
}
