//! Observability counters for the replay service
//!
//! Process-wide counters shared by every session. Sessions never read each
//! other's state; these atomics are the only thing they have in common.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::streamer::StreamOutcome;

/// Core metrics for the replay service.
#[derive(Debug, Default)]
pub struct StreamMetrics {
    // Sessions
    pub sessions_started: AtomicU64,
    pub sessions_completed: AtomicU64,
    pub sessions_disconnected: AtomicU64,
    pub sessions_failed: AtomicU64,
    pub active_sessions: AtomicU64,

    // Frames
    pub frames_sent: AtomicU64,

    // Cache
    pub merged_cache_hits: AtomicU64,
}

/// Point-in-time copy of the counters, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub sessions_started: u64,
    pub sessions_completed: u64,
    pub sessions_disconnected: u64,
    pub sessions_failed: u64,
    pub active_sessions: u64,
    pub frames_sent: u64,
    pub merged_cache_hits: u64,
}

impl StreamMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a session starting.
    pub fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
        self.active_sessions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how a session ended, including the frames it sent.
    pub fn record_session_finished(&self, outcome: &StreamOutcome) {
        let counter = match outcome {
            StreamOutcome::Completed { .. } => &self.sessions_completed,
            StreamOutcome::Disconnected { .. } => &self.sessions_disconnected,
            StreamOutcome::Failed { .. } => &self.sessions_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.frames_sent
            .fetch_add(outcome.frames_sent(), Ordering::Relaxed);
        // Saturating: a finish without a matching start must not wrap.
        let _ = self
            .active_sessions
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Record a merged sequence served from the shared cache.
    pub fn record_cache_hit(&self) {
        self.merged_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            sessions_completed: self.sessions_completed.load(Ordering::Relaxed),
            sessions_disconnected: self.sessions_disconnected.load(Ordering::Relaxed),
            sessions_failed: self.sessions_failed.load(Ordering::Relaxed),
            active_sessions: self.active_sessions.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            merged_cache_hits: self.merged_cache_hits.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::errors::ReplayError;

    #[test]
    fn test_session_lifecycle_counters() {
        let metrics = StreamMetrics::new();
        metrics.record_session_started();
        metrics.record_session_started();
        metrics.record_session_started();
        assert_eq!(metrics.snapshot().active_sessions, 3);

        metrics.record_session_finished(&StreamOutcome::Completed { frames_sent: 11 });
        metrics.record_session_finished(&StreamOutcome::Disconnected { frames_sent: 4 });
        metrics.record_session_finished(&StreamOutcome::Failed {
            frames_sent: 0,
            error: ReplayError::Sink {
                reason: "reset".to_string(),
            },
        });

        let snap = metrics.snapshot();
        assert_eq!(snap.sessions_started, 3);
        assert_eq!(snap.sessions_completed, 1);
        assert_eq!(snap.sessions_disconnected, 1);
        assert_eq!(snap.sessions_failed, 1);
        assert_eq!(snap.active_sessions, 0);
        assert_eq!(snap.frames_sent, 15);
    }

    #[test]
    fn test_active_sessions_saturates() {
        let metrics = StreamMetrics::new();
        metrics.record_session_finished(&StreamOutcome::Completed { frames_sent: 1 });
        assert_eq!(metrics.snapshot().active_sessions, 0);
    }
}
