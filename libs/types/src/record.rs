//! Raw telemetry records and the time-series documents that hold them
//!
//! A record is a flat set of optional numeric fields. The schema is declared
//! once here (`RecordField`) with each field's wire name and the default the
//! normalizer substitutes when the field is absent, so that every lookup goes
//! through a typed accessor instead of a string key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every numeric field a raw record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    JobsPending,
    TraceItPowerMw,
    RenewablePowerMw,
    GridImportMw,
    BatteryPowerMw,
    FlywheelPowerMw,
    DataCenterTotalPowerMw,
    BatterySocFrac,
    FlywheelSocFrac,
    AccumCo2Kg,
    InstabilityIndex,
    GridFrequencyHz,
}

/// Nominal grid frequency, used when a record has no frequency sample.
pub const NOMINAL_GRID_FREQUENCY_HZ: f64 = 60.0;

impl RecordField {
    pub const ALL: [RecordField; 12] = [
        RecordField::JobsPending,
        RecordField::TraceItPowerMw,
        RecordField::RenewablePowerMw,
        RecordField::GridImportMw,
        RecordField::BatteryPowerMw,
        RecordField::FlywheelPowerMw,
        RecordField::DataCenterTotalPowerMw,
        RecordField::BatterySocFrac,
        RecordField::FlywheelSocFrac,
        RecordField::AccumCo2Kg,
        RecordField::InstabilityIndex,
        RecordField::GridFrequencyHz,
    ];

    /// Field name as it appears in the dataset files.
    pub fn name(&self) -> &'static str {
        match self {
            RecordField::JobsPending => "jobs_pending",
            RecordField::TraceItPowerMw => "trace_it_power_mw",
            RecordField::RenewablePowerMw => "renewable_power_mw",
            RecordField::GridImportMw => "grid_import_mw",
            RecordField::BatteryPowerMw => "battery_power_mw",
            RecordField::FlywheelPowerMw => "flywheel_power_mw",
            RecordField::DataCenterTotalPowerMw => "data_center_total_power_mw",
            RecordField::BatterySocFrac => "battery_soc_frac",
            RecordField::FlywheelSocFrac => "flywheel_soc_frac",
            RecordField::AccumCo2Kg => "accum_co2_kg",
            RecordField::InstabilityIndex => "instability_index",
            RecordField::GridFrequencyHz => "grid_frequency_hz",
        }
    }

    /// Value substituted when the field is missing from a record.
    pub fn default_value(&self) -> f64 {
        match self {
            RecordField::GridFrequencyHz => NOMINAL_GRID_FREQUENCY_HZ,
            _ => 0.0,
        }
    }
}

/// One sample from a dataset. Every field is optional; unknown fields in the
/// source file are ignored and `null` reads as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs_pending: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_it_power_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewable_power_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_import_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_power_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flywheel_power_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_center_total_power_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_soc_frac: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flywheel_soc_frac: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accum_co2_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instability_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_frequency_hz: Option<f64>,
}

impl RawRecord {
    /// Raw value of a field, `None` when absent.
    pub fn get(&self, field: RecordField) -> Option<f64> {
        match field {
            RecordField::JobsPending => self.jobs_pending,
            RecordField::TraceItPowerMw => self.trace_it_power_mw,
            RecordField::RenewablePowerMw => self.renewable_power_mw,
            RecordField::GridImportMw => self.grid_import_mw,
            RecordField::BatteryPowerMw => self.battery_power_mw,
            RecordField::FlywheelPowerMw => self.flywheel_power_mw,
            RecordField::DataCenterTotalPowerMw => self.data_center_total_power_mw,
            RecordField::BatterySocFrac => self.battery_soc_frac,
            RecordField::FlywheelSocFrac => self.flywheel_soc_frac,
            RecordField::AccumCo2Kg => self.accum_co2_kg,
            RecordField::InstabilityIndex => self.instability_index,
            RecordField::GridFrequencyHz => self.grid_frequency_hz,
        }
    }

    /// Value of a field, or the field's declared default.
    pub fn value_or_default(&self, field: RecordField) -> f64 {
        self.get(field).unwrap_or_else(|| field.default_value())
    }
}

/// A whole dataset: timestep key (integer stored as text) to record.
///
/// Keys are kept as text here; parsing them into timesteps is the merger's
/// job so that a bad key is reported as a merge failure, not a load failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeriesDocument(BTreeMap<String, RawRecord>);

impl TimeSeriesDocument {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Number of records in the document.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record stored under the exact key text.
    pub fn get(&self, key: &str) -> Option<&RawRecord> {
        self.0.get(key)
    }

    /// Iterate `(key, record)` pairs in key text order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawRecord)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, RawRecord)> for TimeSeriesDocument {
    fn from_iter<I: IntoIterator<Item = (String, RawRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_match_serde_names() {
        let record = RawRecord {
            jobs_pending: Some(1.0),
            trace_it_power_mw: Some(1.0),
            renewable_power_mw: Some(1.0),
            grid_import_mw: Some(1.0),
            battery_power_mw: Some(1.0),
            flywheel_power_mw: Some(1.0),
            data_center_total_power_mw: Some(1.0),
            battery_soc_frac: Some(1.0),
            flywheel_soc_frac: Some(1.0),
            accum_co2_kg: Some(1.0),
            instability_index: Some(1.0),
            grid_frequency_hz: Some(1.0),
        };
        let value = serde_json::to_value(record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), RecordField::ALL.len());
        for field in RecordField::ALL {
            assert!(obj.contains_key(field.name()), "missing {}", field.name());
        }
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record: RawRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, RawRecord::default());
        assert_eq!(record.value_or_default(RecordField::JobsPending), 0.0);
        assert_eq!(record.value_or_default(RecordField::GridFrequencyHz), 60.0);
    }

    #[test]
    fn test_null_and_unknown_fields() {
        let record: RawRecord =
            serde_json::from_str(r#"{"jobs_pending": null, "grid_frequency_hz": 59.98, "extra": 3}"#)
                .unwrap();
        assert_eq!(record.jobs_pending, None);
        assert_eq!(record.get(RecordField::GridFrequencyHz), Some(59.98));
        assert_eq!(
            record,
            RawRecord {
                grid_frequency_hz: Some(59.98),
                ..RawRecord::default()
            }
        );
    }

    #[test]
    fn test_integer_values_read_as_f64() {
        let record: RawRecord = serde_json::from_str(r#"{"jobs_pending": 150}"#).unwrap();
        assert_eq!(record.jobs_pending, Some(150.0));
    }

    #[test]
    fn test_document_parses_keyed_object() {
        let doc: TimeSeriesDocument =
            serde_json::from_str(r#"{"5": {"jobs_pending": 1}, "10": {}}"#).unwrap();
        assert_eq!(doc.len(), 2);
        assert!(doc.get("10").is_some());
        assert_eq!(doc.get("5").and_then(|r| r.jobs_pending), Some(1.0));
    }

    #[test]
    fn test_document_rejects_non_numeric_field() {
        let result: Result<TimeSeriesDocument, _> =
            serde_json::from_str(r#"{"5": {"jobs_pending": "many"}}"#);
        assert!(result.is_err());
    }
}
