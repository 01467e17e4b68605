//! Binary snapshots of rule chain lists.
//!
//! A snapshot lets a host reload its chains without reparsing the settings
//! document. The format consists of a 32-byte fixed header followed by a
//! bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"AMVR"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! ## Versioning
//!
//! The format version in the header must match exactly. If it does not,
//! decoding fails immediately with [`DeserializeError::IncompatibleVersion`].
//! The engine version is informational only.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{RuleChain, RuleStep, StepKind};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"AMVR";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when encoding a chain snapshot.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode chains: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("snapshot payload of {0} bytes exceeds the 4 GiB format limit")]
    TooLarge(usize),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when decoding a chain snapshot.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not an automover snapshot: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedSnapshot {
    metadata: SnapshotMetadata,
    chains: Vec<SerializedChain>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotMetadata {
    chain_count: usize,
    step_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedChain {
    name: String,
    active: bool,
    continue_on_failure: bool,
    steps: Vec<SerializedStep>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedStep {
    kind: SerializedKind,
    key: Option<String>,
    pattern: String,
    folder: String,
    optional: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum SerializedKind {
    Yaml,
    Tag,
    Name,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

fn serialize_kind(kind: StepKind) -> SerializedKind {
    match kind {
        StepKind::Yaml => SerializedKind::Yaml,
        StepKind::Tag => SerializedKind::Tag,
        StepKind::Name => SerializedKind::Name,
    }
}

fn deserialize_kind(kind: SerializedKind) -> StepKind {
    match kind {
        SerializedKind::Yaml => StepKind::Yaml,
        SerializedKind::Tag => StepKind::Tag,
        SerializedKind::Name => StepKind::Name,
    }
}

fn chains_to_serialized(chains: &[RuleChain], source_text: Option<&str>) -> SerializedSnapshot {
    let source_digest = source_text.map(|s| *blake3::hash(s.as_bytes()).as_bytes());

    let chains: Vec<SerializedChain> = chains
        .iter()
        .map(|c| SerializedChain {
            name: c.name.clone(),
            active: c.active,
            continue_on_failure: c.continue_on_failure,
            steps: c
                .steps
                .iter()
                .map(|s| SerializedStep {
                    kind: serialize_kind(s.kind),
                    key: s.key.clone(),
                    pattern: s.pattern.clone(),
                    folder: s.folder.clone(),
                    optional: s.optional,
                })
                .collect(),
        })
        .collect();

    SerializedSnapshot {
        metadata: SnapshotMetadata {
            chain_count: chains.len(),
            step_count: chains.iter().map(|c| c.steps.len()).sum(),
            source_digest,
        },
        chains,
    }
}

fn serialized_to_chains(ser: SerializedSnapshot) -> Result<Vec<RuleChain>, DeserializeError> {
    validate(&ser)?;

    Ok(ser
        .chains
        .into_iter()
        .map(|sc| RuleChain {
            name: sc.name,
            active: sc.active,
            continue_on_failure: sc.continue_on_failure,
            steps: sc
                .steps
                .into_iter()
                .map(|ss| RuleStep {
                    kind: deserialize_kind(ss.kind),
                    key: ss.key,
                    pattern: ss.pattern,
                    folder: ss.folder,
                    optional: ss.optional,
                })
                .collect(),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(ser: &SerializedSnapshot) -> Result<(), DeserializeError> {
    if ser.metadata.chain_count != ser.chains.len() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} chains but payload has {}",
            ser.metadata.chain_count,
            ser.chains.len()
        )));
    }

    let step_count: usize = ser.chains.iter().map(|c| c.steps.len()).sum();
    if ser.metadata.step_count != step_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} steps but payload has {}",
            ser.metadata.step_count, step_count
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Byte ranges of the header fields.
mod offset {
    use std::ops::Range;

    pub(super) const MAGIC: Range<usize> = 0..4;
    pub(super) const FORMAT: Range<usize> = 4..6;
    pub(super) const ENGINE: Range<usize> = 6..8;
    pub(super) const FLAGS: Range<usize> = 8..12;
    pub(super) const PAYLOAD_LEN: Range<usize> = 12..16;
    pub(super) const CHECKSUM: Range<usize> = 16..32;
}

/// The parsed fixed-size header. Magic is checked on decode, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    format_version: u16,
    engine_version: u16,
    payload_len: u32,
    checksum: [u8; 16],
}

fn checksum(payload: &[u8]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out.copy_from_slice(&blake3::hash(payload).as_bytes()[..16]);
    out
}

impl Header {
    fn for_payload(payload: &[u8]) -> Result<Self, SerializeError> {
        let payload_len =
            u32::try_from(payload.len()).map_err(|_| SerializeError::TooLarge(payload.len()))?;
        Ok(Self {
            format_version: FORMAT_VERSION,
            engine_version: ENGINE_VERSION,
            payload_len,
            checksum: checksum(payload),
        })
    }

    fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[offset::MAGIC].copy_from_slice(MAGIC);
        out[offset::FORMAT].copy_from_slice(&self.format_version.to_le_bytes());
        out[offset::ENGINE].copy_from_slice(&self.engine_version.to_le_bytes());
        out[offset::FLAGS].copy_from_slice(&0u32.to_le_bytes());
        out[offset::PAYLOAD_LEN].copy_from_slice(&self.payload_len.to_le_bytes());
        out[offset::CHECKSUM].copy_from_slice(&self.checksum);
        out
    }

    fn parse(bytes: &[u8]) -> Result<Self, DeserializeError> {
        let Some(head) = bytes.get(..HEADER_SIZE) else {
            return Err(DeserializeError::LengthMismatch {
                expected: HEADER_SIZE as u32,
                actual: bytes.len(),
            });
        };
        if head[offset::MAGIC] != MAGIC[..] {
            return Err(DeserializeError::BadMagic);
        }

        let u16_at = |range: std::ops::Range<usize>| {
            u16::from_le_bytes([head[range.start], head[range.start + 1]])
        };
        let mut len = [0u8; 4];
        len.copy_from_slice(&head[offset::PAYLOAD_LEN]);
        let mut checksum = [0u8; 16];
        checksum.copy_from_slice(&head[offset::CHECKSUM]);

        Ok(Self {
            format_version: u16_at(offset::FORMAT),
            engine_version: u16_at(offset::ENGINE),
            payload_len: u32::from_le_bytes(len),
            checksum,
        })
    }
}

fn decode_snapshot(bytes: &[u8]) -> Result<SerializedSnapshot, DeserializeError> {
    let header = Header::parse(bytes)?;

    if header.format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: header.format_version,
            supported: FORMAT_VERSION,
        });
    }
    if header.engine_version != ENGINE_VERSION {
        debug!(
            snapshot = header.engine_version,
            current = ENGINE_VERSION,
            "snapshot written by a different engine version"
        );
    }

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != header.payload_len as usize {
        return Err(DeserializeError::LengthMismatch {
            expected: header.payload_len,
            actual: payload.len(),
        });
    }
    if checksum(payload) != header.checksum {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (snapshot, _): (SerializedSnapshot, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    Ok(snapshot)
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

/// Encode `chains` as a binary snapshot.
///
/// The optional `source_text` (the settings JSON or chain notation the chains
/// came from) is hashed and embedded so a stale snapshot can be detected with
/// [`source_digest_matches()`].
///
/// # Errors
///
/// Returns [`SerializeError`] if encoding fails.
pub fn encode_chains(
    chains: &[RuleChain],
    source_text: Option<&str>,
) -> Result<Vec<u8>, SerializeError> {
    let serialized = chains_to_serialized(chains, source_text);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let header = Header::for_payload(&payload)?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header.to_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode a snapshot produced by [`encode_chains()`].
///
/// # Errors
///
/// Returns [`DeserializeError`] on format, integrity, or validation failure.
pub fn decode_chains(bytes: &[u8]) -> Result<Vec<RuleChain>, DeserializeError> {
    serialized_to_chains(decode_snapshot(bytes)?)
}

/// Whether the snapshot was built from exactly `source_text`.
///
/// Returns `false` when the snapshot carries no digest.
///
/// # Errors
///
/// Returns [`DeserializeError`] if the snapshot itself is unreadable.
pub fn source_digest_matches(bytes: &[u8], source_text: &str) -> Result<bool, DeserializeError> {
    let snapshot = decode_snapshot(bytes)?;
    Ok(snapshot.metadata.source_digest.as_ref()
        == Some(blake3::hash(source_text.as_bytes()).as_bytes()))
}

/// Encode `chains` and write the snapshot to a file.
///
/// # Errors
///
/// Returns [`SerializeError`] on encoding or I/O failure.
pub fn write_snapshot(
    path: impl AsRef<std::path::Path>,
    chains: &[RuleChain],
    source_text: Option<&str>,
) -> Result<(), SerializeError> {
    let bytes = encode_chains(chains, source_text)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Read a snapshot file and decode the chains it contains.
///
/// # Errors
///
/// Returns [`DeserializeError`] on I/O, format, integrity, or validation failure.
pub fn read_snapshot(path: impl AsRef<std::path::Path>) -> Result<Vec<RuleChain>, DeserializeError> {
    let bytes = std::fs::read(path)?;
    decode_chains(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{match_name, match_yaml};

    fn sample() -> Vec<RuleChain> {
        let mut keyless = match_yaml("k", "x").to("X").optional();
        keyless.key = None;
        vec![
            RuleChain::new("Journal").step(match_name(r"^(\d{4})").to("Journal/$1")),
            RuleChain::new("Off")
                .with_active(false)
                .with_continue_on_failure(true)
                .step(keyless),
        ]
    }

    #[test]
    fn header_parses_back() {
        let bytes = encode_chains(&sample(), None).unwrap();
        let header = Header::parse(&bytes).unwrap();
        assert_eq!(header.format_version, FORMAT_VERSION);
        assert_eq!(header.engine_version, ENGINE_VERSION);
        assert_eq!(header.payload_len as usize, bytes.len() - HEADER_SIZE);
        assert_eq!(header.checksum, checksum(&bytes[HEADER_SIZE..]));
        assert_eq!(&header.to_bytes()[..], &bytes[..HEADER_SIZE]);
    }

    #[test]
    fn other_engine_version_still_decodes() {
        let mut bytes = encode_chains(&sample(), None).unwrap();
        bytes[offset::ENGINE].copy_from_slice(&(ENGINE_VERSION + 1).to_le_bytes());
        assert_eq!(decode_chains(&bytes).unwrap(), sample());
    }

    #[test]
    fn header_layout() {
        let bytes = encode_chains(&sample(), None).unwrap();
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), FORMAT_VERSION);
        let len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        assert_eq!(len as usize, bytes.len() - HEADER_SIZE);
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let chains = sample();
        let bytes = encode_chains(&chains, None).unwrap();
        assert_eq!(decode_chains(&bytes).unwrap(), chains);
    }

    #[test]
    fn metadata_mismatch_fails_validation() {
        let mut ser = chains_to_serialized(&sample(), None);
        ser.metadata.step_count += 1;
        assert!(matches!(
            serialized_to_chains(ser),
            Err(DeserializeError::Validation(_))
        ));
    }

    #[test]
    fn short_input_is_length_mismatch() {
        assert!(matches!(
            decode_chains(b"AMVR"),
            Err(DeserializeError::LengthMismatch { expected: 32, actual: 4 })
        ));
    }
}
