//! Frame codec
//!
//! Frames are MessagePack maps keyed by field name. `rmp_serde::to_vec`
//! would encode structs as positional arrays, so encoding always goes
//! through `to_vec_named`.

use serde::de::DeserializeOwned;
use types::errors::ReplayError;
use types::payload::{CompletionFrame, Frame, OutputPayload};

/// Encode any frame.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, ReplayError> {
    let timestep = match frame {
        Frame::Payload(p) => Some(p.timestep),
        Frame::Complete(_) => None,
    };
    rmp_serde::to_vec_named(frame).map_err(|e| ReplayError::Encode {
        timestep,
        reason: e.to_string(),
    })
}

/// Encode a payload frame.
pub fn encode_payload(payload: OutputPayload) -> Result<Vec<u8>, ReplayError> {
    encode_frame(&payload.into())
}

/// Encode the terminal `{complete: true}` frame.
pub fn encode_completion() -> Result<Vec<u8>, ReplayError> {
    encode_frame(&Frame::Complete(CompletionFrame::done()))
}

/// Decode a frame into a concrete type. Used by clients and tests.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, rmp_serde::decode::Error> {
    rmp_serde::from_slice(bytes)
}

/// Whether the bytes are the terminal frame.
pub fn is_completion(bytes: &[u8]) -> bool {
    matches!(decode::<CompletionFrame>(bytes), Ok(CompletionFrame { complete: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use types::record::RawRecord;
    use types::source::SourceTag;

    use crate::normalizer::Normalizer;

    fn sample_payload() -> OutputPayload {
        let record = RawRecord {
            jobs_pending: Some(150.0),
            grid_frequency_hz: Some(59.95),
            ..RawRecord::default()
        };
        Normalizer::default().normalize(&record, 42, SourceTag::AllJobs)
    }

    #[test]
    fn test_payload_is_a_keyed_map() {
        let bytes = encode_payload(sample_payload()).unwrap();
        // 18 entries: map16 marker, not an array marker
        assert_eq!(bytes[0], 0xde);

        let map: BTreeMap<String, serde_json::Value> = decode(&bytes).unwrap();
        assert_eq!(map.len(), 18);
        assert!(map.contains_key("power_queue"));
        assert!(map.contains_key("executing_jobs_state"));
    }

    #[test]
    fn test_payload_decodes_back() {
        let payload = sample_payload();
        let bytes = encode_payload(payload.clone()).unwrap();
        let decoded: OutputPayload = decode(&bytes).unwrap();
        assert_eq!(decoded, payload);
        assert!(!is_completion(&bytes));
    }

    #[test]
    fn test_completion_frame() {
        let bytes = encode_completion().unwrap();
        // fixmap of one entry: {"complete": true}
        assert_eq!(bytes[0], 0x81);
        assert!(is_completion(&bytes));

        let map: BTreeMap<String, bool> = decode(&bytes).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("complete"), Some(&true));
    }
}
