//! Canonical payload and wire frames sent to visualization clients
//!
//! Frames are encoded as self-describing maps keyed by field name, so the
//! serde field names below are the wire contract.

use serde::{Deserialize, Serialize};

use crate::merged::Timestep;

/// Per-job detail slot. Reserved; always sent empty.
pub type JobStates = Vec<serde_json::Value>;

/// One normalized sample, as sent in a single stream frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputPayload {
    pub timestep: Timestep,
    /// Source tag label (`all_jobs` or `rl_min_instability`).
    pub source: String,
    pub pending_jobs_state: JobStates,
    pub executing_jobs_state: JobStates,

    // Derived ratios, capped at 1.0
    pub power_queue: f64,
    pub power_exec: f64,
    pub power_limit: f64,

    // Power quantities in MW
    pub trace_it_power_mw: f64,
    pub renewable_power_mw: f64,
    pub grid_import_mw: f64,
    pub battery_power_mw: f64,
    pub flywheel_power_mw: f64,
    pub data_center_total_power_mw: f64,

    // State of charge, fraction 0..1
    pub battery_soc_frac: f64,
    pub flywheel_soc_frac: f64,

    /// Cumulative emissions in kg.
    pub accum_co2_kg: f64,

    // Grid stability
    pub instability_index: f64,
    pub grid_frequency_hz: f64,
}

/// Terminal sentinel sent once after the last payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionFrame {
    pub complete: bool,
}

impl CompletionFrame {
    pub fn done() -> Self {
        Self { complete: true }
    }
}

/// Anything that can be sent as one stream frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Frame {
    Payload(OutputPayload),
    Complete(CompletionFrame),
}

impl From<OutputPayload> for Frame {
    fn from(payload: OutputPayload) -> Self {
        Frame::Payload(payload)
    }
}
