//! Grid Replay Service
//!
//! Replays two recorded grid-telemetry datasets to a streaming client:
//! - Loads both keyed time-series documents
//! - Merges them into one chronological, dual-provenance sequence
//! - Normalizes each record into the canonical payload shape
//! - Streams one MessagePack frame per record at a fixed cadence, then a
//!   terminal `{complete: true}` frame
//!
//! # Architecture
//!
//! ```text
//!   all_jobs.json   rl_min_instability.json
//!        │                  │
//!    ┌───▼──────────────────▼───┐
//!    │          Loader          │
//!    └────────────┬─────────────┘
//!                 │
//!    ┌────────────▼─────────────┐
//!    │  Merger (interleave,     │
//!    │  all_jobs first on ties) │
//!    └────────────┬─────────────┘
//!                 │  per item
//!    ┌────────────▼─────────────┐
//!    │  Normalizer → Codec      │
//!    └────────────┬─────────────┘
//!                 │
//!    ┌────────────▼─────────────┐
//!    │  Pacing Streamer → Sink  │
//!    └──────────────────────────┘
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod loader;
pub mod merger;
pub mod metrics;
pub mod normalizer;
pub mod session;
pub mod streamer;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
