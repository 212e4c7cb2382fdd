use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::DataLoadError;
use super::loader::load_file;
use super::model::MovieDataset;

/// Loads the dataset on first access and hands out the same `Arc` afterwards.
///
/// Owned by whoever drives the dashboard and passed down explicitly, so tests
/// and the "File → Open" path can each use their own instance.
#[derive(Debug)]
pub struct DatasetCache {
    source: PathBuf,
    entry: Option<Arc<MovieDataset>>,
    loads: usize,
}

impl DatasetCache {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        DatasetCache {
            source: source.into(),
            entry: None,
            loads: 0,
        }
    }

    /// Pre-populated cache for a dataset built in memory.
    #[cfg(test)]
    pub fn with_dataset(source: impl Into<PathBuf>, dataset: MovieDataset) -> Self {
        DatasetCache {
            source: source.into(),
            entry: Some(Arc::new(dataset)),
            loads: 0,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Return the cached dataset, reading the source only on the first call.
    /// Failures are not cached; the next call retries the read.
    pub fn get(&mut self) -> Result<Arc<MovieDataset>, DataLoadError> {
        if let Some(dataset) = &self.entry {
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load_file(&self.source)?);
        self.loads += 1;
        self.entry = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Number of successful source reads.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}
