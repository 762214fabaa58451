//! Dataset loader
//!
//! Reads the two recorded time-series documents. Both must load; there is
//! no partial result. Any missing, unreadable, or malformed file is reported
//! as `ReplayError::DataUnavailable` naming the dataset.

use std::path::Path;

use tracing::{debug, warn};
use types::errors::ReplayError;
use types::record::TimeSeriesDocument;
use types::source::SourceTag;

use crate::config::DatasetPaths;

/// Both source documents, loaded together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedDatasets {
    pub all_jobs: TimeSeriesDocument,
    pub rl_min_instability: TimeSeriesDocument,
}

impl LoadedDatasets {
    pub fn new(all_jobs: TimeSeriesDocument, rl_min_instability: TimeSeriesDocument) -> Self {
        Self {
            all_jobs,
            rl_min_instability,
        }
    }

    /// Total records across both documents.
    pub fn record_count(&self) -> usize {
        self.all_jobs.len() + self.rl_min_instability.len()
    }
}

/// Reads the dataset pair from the filesystem.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    paths: DatasetPaths,
}

impl DatasetLoader {
    pub fn new(paths: DatasetPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &DatasetPaths {
        &self.paths
    }

    /// Load both documents. Reads run concurrently; if both fail, the
    /// all-jobs error is the one reported.
    pub async fn load(&self) -> Result<LoadedDatasets, ReplayError> {
        let (all_jobs, rl_min_instability) = tokio::join!(
            load_document(SourceTag::AllJobs, &self.paths.all_jobs),
            load_document(SourceTag::RlMinInstability, &self.paths.rl_min_instability),
        );

        Ok(LoadedDatasets::new(all_jobs?, rl_min_instability?))
    }
}

/// Read and parse a single document.
pub async fn load_document(
    dataset: SourceTag,
    path: &Path,
) -> Result<TimeSeriesDocument, ReplayError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        warn!(%dataset, path = %path.display(), error = %e, "Dataset read failed");
        ReplayError::DataUnavailable {
            dataset,
            reason: format!("{}: {}", path.display(), e),
        }
    })?;

    let document = parse_document(dataset, &bytes)?;

    debug!(
        %dataset,
        path = %path.display(),
        records = document.len(),
        "Dataset loaded"
    );

    Ok(document)
}

/// Parse a document from raw JSON bytes.
pub fn parse_document(dataset: SourceTag, bytes: &[u8]) -> Result<TimeSeriesDocument, ReplayError> {
    serde_json::from_slice(bytes).map_err(|e| ReplayError::DataUnavailable {
        dataset,
        reason: format!("not a timestep→record mapping: {}", e),
    })
}
