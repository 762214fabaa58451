use clap::Parser;
use grid_replay::config::{
    DEFAULT_ALL_JOBS_FILE, DEFAULT_RL_MIN_INSTABILITY_FILE, DatasetPaths, NormalizerConfig,
    ReplayConfig, StreamerConfig,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Startup configuration. Every flag can also be set through its
/// `GRID_STREAM_*` environment variable.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Grid telemetry replay stream server", long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "GRID_STREAM_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Directory holding both dataset files
    #[arg(long, env = "GRID_STREAM_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// All-jobs dataset file name, relative to the data directory
    #[arg(long, env = "GRID_STREAM_ALL_JOBS_FILE", default_value = DEFAULT_ALL_JOBS_FILE)]
    pub all_jobs_file: String,

    /// RL min-instability dataset file name, relative to the data directory
    #[arg(
        long,
        env = "GRID_STREAM_RL_MIN_INSTABILITY_FILE",
        default_value = DEFAULT_RL_MIN_INSTABILITY_FILE
    )]
    pub rl_min_instability_file: String,

    /// Pause after each streamed frame, in milliseconds
    #[arg(long, env = "GRID_STREAM_PACING_INTERVAL_MS", default_value_t = 100)]
    pub pacing_interval_ms: u64,

    /// Pending-job count mapped to power_queue = 1.0
    #[arg(long, env = "GRID_STREAM_QUEUE_CEILING", default_value_t = 300.0, value_parser = positive_f64)]
    pub queue_ceiling: f64,

    /// IT power draw (MW) mapped to power_exec = 1.0
    #[arg(long, env = "GRID_STREAM_EXEC_CEILING", default_value_t = 10.0, value_parser = positive_f64)]
    pub exec_ceiling: f64,

    /// Load and merge the datasets once and share them across connections
    #[arg(long, env = "GRID_STREAM_CACHE_MERGED")]
    pub cache_merged: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "GRID_STREAM_LOG_JSON")]
    pub log_json: bool,
}

fn positive_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive number, got {value}"))
    }
}

impl Config {
    pub fn dataset_paths(&self) -> DatasetPaths {
        DatasetPaths::new(
            self.data_dir.join(&self.all_jobs_file),
            self.data_dir.join(&self.rl_min_instability_file),
        )
    }

    pub fn replay_config(&self) -> ReplayConfig {
        ReplayConfig {
            datasets: self.dataset_paths(),
            normalizer: NormalizerConfig {
                queue_ceiling: self.queue_ceiling,
                exec_ceiling_mw: self.exec_ceiling,
            },
            streamer: StreamerConfig {
                pacing_interval: Duration::from_millis(self.pacing_interval_ms),
            },
            cache_merged: self.cache_merged,
        }
    }
}
