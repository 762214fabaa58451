//! Items of the chronologically merged sequence

use serde::{Deserialize, Serialize};

use crate::record::RawRecord;
use crate::source::SourceTag;

/// Integer time index of one sample.
pub type Timestep = i64;

/// One record of the merged sequence, tagged with the dataset it came from.
///
/// Ordering is by `timestep`, then by `source` (`AllJobs` first). Records are
/// never fused: a timestep present in both datasets yields two items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedItem {
    pub source: SourceTag,
    pub timestep: Timestep,
    pub record: RawRecord,
}

impl MergedItem {
    pub fn new(source: SourceTag, timestep: Timestep, record: RawRecord) -> Self {
        Self {
            source,
            timestep,
            record,
        }
    }

    /// Sort key of this item within the merged sequence.
    pub fn order_key(&self) -> (Timestep, SourceTag) {
        (self.timestep, self.source)
    }
}
