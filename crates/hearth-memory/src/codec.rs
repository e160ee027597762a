//! Blob codec for the memory event collection.
//!
//! The persisted blob is a JSON envelope carrying an explicit format
//! version next to the ordered event list:
//!
//! ```json
//! { "version": 1, "events": [ { "id": "…", "subject": "妈妈", … } ] }
//! ```
//!
//! A blob whose version differs from [`FORMAT_VERSION`] is rejected with
//! [`CodecError::VersionMismatch`] rather than being read as if it were the
//! current layout.

use hearth_types::MemoryEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current blob format version.
pub const FORMAT_VERSION: u32 = 1;

/// Errors from encoding or decoding the event blob.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    events: &'a [MemoryEvent],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    events: Vec<MemoryEvent>,
}

/// Only the version, so an incompatible payload can be identified before
/// its event list is parsed.
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Encode the full ordered event list into a blob.
pub fn encode(events: &[MemoryEvent]) -> Result<Vec<u8>, CodecError> {
    let envelope = EnvelopeRef {
        version: FORMAT_VERSION,
        events,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decode a blob produced by [`encode`].
pub fn decode(blob: &[u8]) -> Result<Vec<MemoryEvent>, CodecError> {
    let probe: VersionProbe = serde_json::from_slice(blob)?;
    if probe.version != FORMAT_VERSION {
        return Err(CodecError::VersionMismatch {
            expected: FORMAT_VERSION,
            found: probe.version,
        });
    }
    let envelope: Envelope = serde_json::from_slice(blob)?;
    Ok(envelope.events)
}
