//! Configuration for the replay pipeline
//!
//! Every tunable has a `Default` carrying the value the pipeline was
//! calibrated with, so an embedding binary can expose them as startup
//! flags without changing behavior when they are left unset.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Canonical file name of the all-jobs trace.
pub const DEFAULT_ALL_JOBS_FILE: &str = "ercot_grid_rl_synthetic_trace_all_jobs.json";
/// Canonical file name of the RL min-instability trace.
pub const DEFAULT_RL_MIN_INSTABILITY_FILE: &str =
    "ercot_grid_rl_synthetic_trace_rl_min_instability.json";

/// Locations of the two source datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub all_jobs: PathBuf,
    pub rl_min_instability: PathBuf,
}

impl DatasetPaths {
    pub fn new(all_jobs: impl Into<PathBuf>, rl_min_instability: impl Into<PathBuf>) -> Self {
        Self {
            all_jobs: all_jobs.into(),
            rl_min_instability: rl_min_instability.into(),
        }
    }

    /// Both datasets under `dir`, using the canonical file names.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(
            dir.join(DEFAULT_ALL_JOBS_FILE),
            dir.join(DEFAULT_RL_MIN_INSTABILITY_FILE),
        )
    }
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self::in_dir(Path::new("data"))
    }
}

/// Ceilings used to turn unbounded quantities into unit ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerConfig {
    /// Queue depth mapped to `power_queue = 1.0`.
    pub queue_ceiling: f64,
    /// IT power draw (MW) mapped to `power_exec = 1.0`.
    pub exec_ceiling_mw: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            queue_ceiling: 300.0,
            exec_ceiling_mw: 10.0,
        }
    }
}

/// Pacing of the outbound stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamerConfig {
    /// Pause after every payload frame (default 100ms, i.e. 10 frames/s).
    pub pacing_interval: Duration,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            pacing_interval: Duration::from_millis(100),
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayConfig {
    pub datasets: DatasetPaths,
    pub normalizer: NormalizerConfig,
    pub streamer: StreamerConfig,
    /// Share one merged sequence across sessions instead of reloading per
    /// connection. Inputs are static files, so output is unchanged.
    pub cache_merged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReplayConfig::default();
        assert_eq!(config.normalizer.queue_ceiling, 300.0);
        assert_eq!(config.normalizer.exec_ceiling_mw, 10.0);
        assert_eq!(config.streamer.pacing_interval, Duration::from_millis(100));
        assert!(!config.cache_merged);
        assert_eq!(
            config.datasets.all_jobs,
            PathBuf::from("data").join(DEFAULT_ALL_JOBS_FILE)
        );
    }

    #[test]
    fn test_in_dir() {
        let paths = DatasetPaths::in_dir(Path::new("/srv/grid"));
        assert_eq!(
            paths.rl_min_instability,
            PathBuf::from("/srv/grid/ercot_grid_rl_synthetic_trace_rl_min_instability.json")
        );
    }
}
