use crate::config::Config;
use grid_replay::metrics::StreamMetrics;
use grid_replay::session::ReplayService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub replay: ReplayService,
    pub metrics: Arc<StreamMetrics>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let metrics = Arc::new(StreamMetrics::new());
        Self {
            replay: ReplayService::new(config.replay_config()).with_metrics(Arc::clone(&metrics)),
            metrics,
        }
    }
}
