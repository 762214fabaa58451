//! Stream sessions
//!
//! One session per client connection: load both datasets, merge them, and
//! stream the result. Sessions share nothing mutable except the metrics
//! counters and, when enabled, the read-only merged cache.

use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};
use types::errors::ReplayError;
use types::ids::SessionId;
use types::merged::MergedItem;

use crate::cache::{MergedCache, SharedSequence};
use crate::config::ReplayConfig;
use crate::loader::DatasetLoader;
use crate::merger;
use crate::metrics::StreamMetrics;
use crate::normalizer::Normalizer;
use crate::streamer::{close_quietly, FrameSink, PacingStreamer, StreamOutcome};

/// Load both datasets and merge them.
pub async fn load_sequence(loader: &DatasetLoader) -> Result<Vec<MergedItem>, ReplayError> {
    let datasets = loader.load().await?;
    merger::merge(&datasets)
}

/// Result of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub outcome: StreamOutcome,
}

/// Runs replay sessions. Cheap to clone; clones share metrics and cache.
#[derive(Debug, Clone)]
pub struct ReplayService {
    loader: DatasetLoader,
    streamer: PacingStreamer,
    cache: Option<Arc<MergedCache>>,
    metrics: Arc<StreamMetrics>,
}

impl ReplayService {
    pub fn new(config: ReplayConfig) -> Self {
        let loader = DatasetLoader::new(config.datasets);
        let cache = config
            .cache_merged
            .then(|| Arc::new(MergedCache::new(loader.clone())));

        Self {
            loader,
            streamer: PacingStreamer::new(Normalizer::new(config.normalizer), config.streamer),
            cache,
            metrics: Arc::new(StreamMetrics::new()),
        }
    }

    /// Use an externally owned metrics registry.
    pub fn with_metrics(mut self, metrics: Arc<StreamMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<StreamMetrics> {
        &self.metrics
    }

    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    async fn sequence(&self) -> Result<SharedSequence, ReplayError> {
        match &self.cache {
            Some(cache) => {
                let (sequence, hit) = cache.get().await?;
                if hit {
                    self.metrics.record_cache_hit();
                }
                Ok(sequence)
            }
            None => Ok(Arc::new(load_sequence(&self.loader).await?)),
        }
    }

    /// Run a full session against `sink`, under a fresh session id.
    pub async fn run_session<S>(&self, sink: &mut S) -> SessionReport
    where
        S: FrameSink + ?Sized,
    {
        self.run_session_with_id(SessionId::new(), sink).await
    }

    /// Run a full session against `sink`. The sink is always closed.
    pub async fn run_session_with_id<S>(&self, session_id: SessionId, sink: &mut S) -> SessionReport
    where
        S: FrameSink + ?Sized,
    {
        let span = info_span!("session", %session_id);

        let outcome = async move {
            self.metrics.record_session_started();

            let outcome = match self.sequence().await {
                Ok(sequence) => {
                    info!(records = sequence.len(), "Loaded records from both datasets");
                    self.streamer.run(&sequence, sink).await
                }
                Err(error) => {
                    error!(%error, "Session aborted before streaming");
                    close_quietly(sink).await;
                    StreamOutcome::Failed {
                        frames_sent: 0,
                        error,
                    }
                }
            };

            self.metrics.record_session_finished(&outcome);
            info!(
                outcome = outcome.label(),
                frames_sent = outcome.frames_sent(),
                metrics = ?self.metrics.snapshot(),
                "Session ended"
            );
            outcome
        }
        .instrument(span)
        .await;

        SessionReport {
            session_id,
            outcome,
        }
    }
}
