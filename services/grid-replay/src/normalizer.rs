//! Record normalizer
//!
//! Maps one raw record into the payload shape the visualization client
//! renders. Pure and total: absent fields take the schema default and
//! nothing here can fail.
//!
//! Only the upper bound of the derived ratios is enforced. Negative inputs
//! pass through as negative ratios.

use types::merged::{MergedItem, Timestep};
use types::payload::OutputPayload;
use types::record::{RawRecord, RecordField};
use types::source::SourceTag;

use crate::config::NormalizerConfig;

/// `power_limit` has no driving field in either dataset.
pub const POWER_LIMIT: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a raw record observed at `timestep` in `source`.
    pub fn normalize(
        &self,
        record: &RawRecord,
        timestep: Timestep,
        source: SourceTag,
    ) -> OutputPayload {
        let field = |f: RecordField| record.value_or_default(f);

        let jobs_pending = field(RecordField::JobsPending);
        let trace_it_power_mw = field(RecordField::TraceItPowerMw);

        OutputPayload {
            timestep,
            source: source.as_str().to_string(),
            pending_jobs_state: Vec::new(),
            executing_jobs_state: Vec::new(),
            power_queue: capped_ratio(jobs_pending, self.config.queue_ceiling),
            power_exec: capped_ratio(trace_it_power_mw, self.config.exec_ceiling_mw),
            power_limit: POWER_LIMIT,
            trace_it_power_mw,
            renewable_power_mw: field(RecordField::RenewablePowerMw),
            grid_import_mw: field(RecordField::GridImportMw),
            battery_power_mw: field(RecordField::BatteryPowerMw),
            flywheel_power_mw: field(RecordField::FlywheelPowerMw),
            data_center_total_power_mw: field(RecordField::DataCenterTotalPowerMw),
            battery_soc_frac: field(RecordField::BatterySocFrac),
            flywheel_soc_frac: field(RecordField::FlywheelSocFrac),
            accum_co2_kg: field(RecordField::AccumCo2Kg),
            instability_index: field(RecordField::InstabilityIndex),
            grid_frequency_hz: field(RecordField::GridFrequencyHz),
        }
    }

    /// Normalize a merged sequence item.
    pub fn normalize_item(&self, item: &MergedItem) -> OutputPayload {
        self.normalize(&item.record, item.timestep, item.source)
    }
}

/// `value / ceiling`, capped at 1.0 from above only.
pub fn capped_ratio(value: f64, ceiling: f64) -> f64 {
    (value / ceiling).min(1.0)
}


// ── Property-Based Tests ────────────────────────────────────────────
