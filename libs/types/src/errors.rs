//! Error types for the replay pipeline
//!
//! Comprehensive error taxonomy using thiserror. A client disconnect is not
//! in here: it is an expected session outcome, not an error.

use thiserror::Error;

use crate::source::SourceTag;

/// Session-fatal errors raised while loading, merging, or streaming.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayError {
    #[error("Dataset {dataset} unavailable: {reason}")]
    DataUnavailable { dataset: SourceTag, reason: String },

    #[error("Malformed timestep key {key:?} in {dataset}: {reason}")]
    MalformedKey {
        dataset: SourceTag,
        key: String,
        reason: String,
    },

    #[error("Frame encoding failed at timestep {timestep:?}: {reason}")]
    Encode { timestep: Option<i64>, reason: String },

    #[error("Sink failure: {reason}")]
    Sink { reason: String },
}
