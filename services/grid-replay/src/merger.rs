//! Timestep merger
//!
//! Interleaves the two datasets into one chronological sequence. Records
//! sharing a timestep are emitted as two separate items, the all-jobs item
//! first; nothing is fused, deduplicated, or gap-filled, so the output
//! length is always the sum of the two document sizes.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};
use types::errors::ReplayError;
use types::merged::{MergedItem, Timestep};
use types::record::{RawRecord, TimeSeriesDocument};
use types::source::SourceTag;

use crate::loader::LoadedDatasets;

/// Parse a timestep key. Decimal integer with an optional sign; no
/// surrounding whitespace.
pub fn parse_timestep(dataset: SourceTag, key: &str) -> Result<Timestep, ReplayError> {
    key.parse::<Timestep>()
        .map_err(|e| ReplayError::MalformedKey {
            dataset,
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Index a document by integer timestep.
///
/// Distinct keys can parse to the same timestep (`"5"` and `"05"`). All of
/// their records are kept, in key text order, so no record is dropped.
fn index_by_timestep(
    dataset: SourceTag,
    document: &TimeSeriesDocument,
) -> Result<BTreeMap<Timestep, Vec<RawRecord>>, ReplayError> {
    let mut indexed: BTreeMap<Timestep, Vec<RawRecord>> = BTreeMap::new();

    // Document iteration is already in key text order.
    for (key, record) in document.iter() {
        let timestep = parse_timestep(dataset, key)?;
        let records = indexed.entry(timestep).or_default();
        if !records.is_empty() {
            warn!(%dataset, key, timestep, "Several keys share one timestep");
        }
        records.push(*record);
    }

    Ok(indexed)
}

/// Merge two documents into the ordered sequence.
pub fn merge_documents(
    all_jobs: &TimeSeriesDocument,
    rl_min_instability: &TimeSeriesDocument,
) -> Result<Vec<MergedItem>, ReplayError> {
    let all_jobs_index = index_by_timestep(SourceTag::AllJobs, all_jobs)?;
    let rl_min_index = index_by_timestep(SourceTag::RlMinInstability, rl_min_instability)?;

    let timesteps: BTreeSet<Timestep> = all_jobs_index
        .keys()
        .chain(rl_min_index.keys())
        .copied()
        .collect();

    let mut merged = Vec::with_capacity(all_jobs.len() + rl_min_instability.len());
    for timestep in timesteps {
        for (source, index) in [
            (SourceTag::AllJobs, &all_jobs_index),
            (SourceTag::RlMinInstability, &rl_min_index),
        ] {
            if let Some(records) = index.get(&timestep) {
                merged.extend(
                    records
                        .iter()
                        .map(|record| MergedItem::new(source, timestep, *record)),
                );
            }
        }
    }

    debug!(
        all_jobs = all_jobs.len(),
        rl_min_instability = rl_min_instability.len(),
        merged = merged.len(),
        "Datasets merged"
    );

    Ok(merged)
}

/// Merge a loaded dataset pair.
pub fn merge(datasets: &LoadedDatasets) -> Result<Vec<MergedItem>, ReplayError> {
    merge_documents(&datasets.all_jobs, &datasets.rl_min_instability)
}


// ── Property-Based Tests ────────────────────────────────────────────
