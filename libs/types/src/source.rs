//! Dataset provenance tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two recorded datasets a record came from.
///
/// The derived `Ord` follows declaration order, which is also the tie-break
/// order when both datasets carry the same timestep: `AllJobs` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Trace replayed with every job admitted.
    AllJobs,
    /// Trace produced by the RL policy minimizing grid instability.
    RlMinInstability,
}

impl SourceTag {
    /// Both tags in tie-break order.
    pub const ALL: [SourceTag; 2] = [SourceTag::AllJobs, SourceTag::RlMinInstability];

    /// Wire label, as sent in the payload `source` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::AllJobs => "all_jobs",
            SourceTag::RlMinInstability => "rl_min_instability",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
