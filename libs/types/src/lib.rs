//! Types library for the grid telemetry replay stream
//!
//! This library provides the type definitions shared by the replay pipeline
//! and the gateway that hosts it: the two source datasets, the declared
//! record schema, the merged sequence item, and the payload frames sent to
//! visualization clients.
//!
//! # Modules
//! - `ids`: Session identifiers
//! - `source`: Dataset provenance tags
//! - `record`: Raw record schema and time-series documents
//! - `merged`: Chronologically merged sequence items
//! - `payload`: Canonical output payload and wire frames
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod source;
pub mod record;
pub mod merged;
pub mod payload;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::source::*;
    pub use crate::record::*;
    pub use crate::merged::*;
    pub use crate::payload::*;
    pub use crate::errors::*;
}
