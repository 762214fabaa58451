//! Pacing streamer
//!
//! Drives the merged sequence through the normalizer and codec, sending one
//! frame per item and pausing for the configured interval after each one.
//! After the last item a single `{complete: true}` frame is sent.
//!
//! Flow: normalize → encode → send → sleep, repeated; then sentinel.
//!
//! A disconnect reported by the sink halts the loop immediately: no further
//! payloads and no sentinel. It is an expected outcome, not an error.

use async_trait::async_trait;
use tracing::{debug, error, info};
use types::errors::ReplayError;
use types::merged::{MergedItem, Timestep};

use crate::codec;
use crate::config::StreamerConfig;
use crate::normalizer::Normalizer;

/// Errors a frame sink can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("consumer disconnected")]
    Disconnected,

    #[error("sink failure: {0}")]
    Failed(String),
}

/// Destination for encoded frames, typically one client connection.
#[async_trait]
pub trait FrameSink: Send {
    /// Send one binary frame.
    async fn send_frame(&mut self, frame: Vec<u8>) -> Result<(), SinkError>;

    /// Close the sink. Called once at the end of every session.
    async fn close(&mut self) -> Result<(), SinkError>;
}

/// How a stream ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// Every payload and the sentinel were sent.
    Completed { frames_sent: u64 },
    /// The consumer went away; the rest of the sequence was abandoned.
    Disconnected { frames_sent: u64 },
    /// A sink or encoding fault ended the stream.
    Failed { frames_sent: u64, error: ReplayError },
}

impl StreamOutcome {
    /// Frames successfully handed to the sink, sentinel included.
    pub fn frames_sent(&self) -> u64 {
        match self {
            StreamOutcome::Completed { frames_sent }
            | StreamOutcome::Disconnected { frames_sent }
            | StreamOutcome::Failed { frames_sent, .. } => *frames_sent,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StreamOutcome::Completed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            StreamOutcome::Completed { .. } => "completed",
            StreamOutcome::Disconnected { .. } => "disconnected",
            StreamOutcome::Failed { .. } => "failed",
        }
    }
}

/// Sends a merged sequence at a fixed cadence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacingStreamer {
    normalizer: Normalizer,
    config: StreamerConfig,
}

impl PacingStreamer {
    pub fn new(normalizer: Normalizer, config: StreamerConfig) -> Self {
        Self { normalizer, config }
    }

    pub fn config(&self) -> &StreamerConfig {
        &self.config
    }

    /// Stream `items` into `sink`. Does not close the sink.
    pub async fn stream<S>(&self, items: &[MergedItem], sink: &mut S) -> StreamOutcome
    where
        S: FrameSink + ?Sized,
    {
        let mut frames_sent: u64 = 0;

        for item in items {
            let payload = self.normalizer.normalize_item(item);

            let frame = match codec::encode_payload(payload) {
                Ok(frame) => frame,
                Err(error) => {
                    error!(
                        timestep = item.timestep,
                        source = %item.source,
                        %error,
                        "Payload encoding failed, ending stream"
                    );
                    return StreamOutcome::Failed { frames_sent, error };
                }
            };

            if let Err(e) = sink.send_frame(frame).await {
                return sink_failure(e, frames_sent, Some(item.timestep));
            }
            frames_sent += 1;

            tokio::time::sleep(self.config.pacing_interval).await;
        }

        let sentinel = match codec::encode_completion() {
            Ok(frame) => frame,
            Err(error) => {
                error!(%error, "Completion frame encoding failed");
                return StreamOutcome::Failed { frames_sent, error };
            }
        };

        if let Err(e) = sink.send_frame(sentinel).await {
            return sink_failure(e, frames_sent, None);
        }
        frames_sent += 1;

        info!(frames_sent, "Stream completed");
        StreamOutcome::Completed { frames_sent }
    }

    /// Stream `items`, then close the sink whatever the outcome.
    pub async fn run<S>(&self, items: &[MergedItem], sink: &mut S) -> StreamOutcome
    where
        S: FrameSink + ?Sized,
    {
        let outcome = self.stream(items, sink).await;
        close_quietly(sink).await;
        outcome
    }
}

fn sink_failure(err: SinkError, frames_sent: u64, timestep: Option<Timestep>) -> StreamOutcome {
    match err {
        SinkError::Disconnected => {
            info!(frames_sent, ?timestep, "Client disconnected");
            StreamOutcome::Disconnected { frames_sent }
        }
        SinkError::Failed(reason) => {
            error!(frames_sent, ?timestep, %reason, "Streaming error");
            StreamOutcome::Failed {
                frames_sent,
                error: ReplayError::Sink { reason },
            }
        }
    }
}

/// Best-effort close; failures are logged and dropped.
pub async fn close_quietly<S>(sink: &mut S)
where
    S: FrameSink + ?Sized,
{
    if let Err(e) = sink.close().await {
        debug!(error = %e, "Sink close failed");
    }
}
