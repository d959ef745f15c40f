//! Frame-log snapshot export.
//!
//! After a top-level action completes, its sealed frame log can be encoded
//! as a self-describing binary snapshot via `bitcode`, for the external
//! event/cancellation layer or post-mortem capture. Only structure is
//! exported -- kinds, statuses, sequence numbers, parent links, and
//! mutation records. Effect instances themselves are never serialized.

use crate::capture::TransactionalCaptureSupplier;
use crate::effect::EffectKind;
use crate::frame::{FrameStatus, MutationRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a frame-log snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0xC4A0_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during snapshot encoding.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
    #[cfg(feature = "json-export")]
    #[error("json encoding failed: {0}")]
    Json(String),
}

/// Errors that can occur during snapshot decoding.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// Header prepended to every snapshot. Enables format detection and version
/// checking before trusting the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    pub frame_count: u32,
}

impl SnapshotHeader {
    pub fn new(frame_count: u32) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            frame_count,
        }
    }

    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

/// One exported frame. Frames are referenced by sequence number, which is
/// stable across encode/decode, unlike arena keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub seq: u64,
    pub kind: EffectKind,
    pub status: FrameStatus,
    /// Sequence number of the parent frame, `None` at the root.
    pub parent: Option<u64>,
    pub mutations: Vec<MutationRecord>,
}

/// A complete exported frame log, in open order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameLogSnapshot {
    pub header: SnapshotHeader,
    pub frames: Vec<FrameRecord>,
}

// ---------------------------------------------------------------------------
// Export / encode / decode
// ---------------------------------------------------------------------------

/// Capture the sealed frame log of a supplier as a snapshot. Open frames
/// (there should be none once the action completed) are excluded.
pub fn snapshot_frames(supplier: &TransactionalCaptureSupplier) -> FrameLogSnapshot {
    let seq_by_id: HashMap<_, _> = supplier
        .drain_frames()
        .map(|(id, frame)| (id, frame.seq()))
        .collect();

    let frames: Vec<FrameRecord> = supplier
        .drain_frames()
        .map(|(_, frame)| FrameRecord {
            seq: frame.seq(),
            kind: frame.kind(),
            status: frame.status(),
            parent: frame.parent().and_then(|p| seq_by_id.get(&p).copied()),
            mutations: frame.mutations().to_vec(),
        })
        .collect();

    FrameLogSnapshot {
        header: SnapshotHeader::new(frames.len() as u32),
        frames,
    }
}

/// Encode a snapshot to bytes.
pub fn encode(snapshot: &FrameLogSnapshot) -> Result<Vec<u8>, SerializeError> {
    bitcode::serialize(snapshot).map_err(|e| SerializeError::Encode(e.to_string()))
}

/// Decode and validate a snapshot from bytes.
pub fn decode(data: &[u8]) -> Result<FrameLogSnapshot, DeserializeError> {
    let snapshot: FrameLogSnapshot =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    snapshot.header.validate()?;
    Ok(snapshot)
}

/// Encode a snapshot as human-readable JSON, for tooling and debugging.
#[cfg(feature = "json-export")]
pub fn to_json(snapshot: &FrameLogSnapshot) -> Result<String, SerializeError> {
    serde_json::to_string_pretty(snapshot).map_err(|e| SerializeError::Json(e.to_string()))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::BlockPos;
    use crate::frame::FrameStatus;

    fn sample_supplier() -> TransactionalCaptureSupplier {
        let mut supplier = TransactionalCaptureSupplier::new();
        let outer = supplier.open_frame(EffectKind::UseItemOnBlock);
        supplier
            .record(MutationRecord::Ignition {
                pos: BlockPos::new(1, 2, 3),
            })
            .unwrap();
        let inner = supplier.open_frame(EffectKind::BroadcastChanges);
        supplier.close_frame(inner, FrameStatus::Sealed).unwrap();
        supplier.close_frame(outer, FrameStatus::Faulted).unwrap();
        supplier
    }

    // -----------------------------------------------------------------------
    // Test 1: Snapshot captures structure in open order
    // -----------------------------------------------------------------------
    #[test]
    fn snapshot_captures_structure() {
        let supplier = sample_supplier();
        let snapshot = snapshot_frames(&supplier);

        assert_eq!(snapshot.header.frame_count, 2);
        assert_eq!(snapshot.frames[0].seq, 0);
        assert_eq!(snapshot.frames[0].kind, EffectKind::UseItemOnBlock);
        assert_eq!(snapshot.frames[0].status, FrameStatus::Faulted);
        assert_eq!(snapshot.frames[0].parent, None);
        assert_eq!(snapshot.frames[0].mutations.len(), 1);

        assert_eq!(snapshot.frames[1].seq, 1);
        assert_eq!(snapshot.frames[1].parent, Some(0));
    }

    // -----------------------------------------------------------------------
    // Test 2: Encode/decode round trip
    // -----------------------------------------------------------------------
    #[test]
    fn encode_decode_round_trip() {
        let supplier = sample_supplier();
        let snapshot = snapshot_frames(&supplier);

        let data = encode(&snapshot).unwrap();
        let decoded = decode(&data).unwrap();
        assert_eq!(decoded.frames, snapshot.frames);
    }

    // -----------------------------------------------------------------------
    // Test 3: Header validation
    // -----------------------------------------------------------------------
    #[test]
    fn header_validation() {
        let mut header = SnapshotHeader::new(0);
        assert!(header.validate().is_ok());

        header.magic = 0xDEAD_BEEF;
        assert!(matches!(
            header.validate(),
            Err(DeserializeError::InvalidMagic(0xDEAD_BEEF))
        ));

        let mut header = SnapshotHeader::new(0);
        header.version = FORMAT_VERSION + 1;
        assert!(matches!(
            header.validate(),
            Err(DeserializeError::FutureVersion(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Test 4: Garbage bytes fail to decode
    // -----------------------------------------------------------------------
    #[test]
    fn garbage_fails_to_decode() {
        let result = decode(&[0x00, 0x01, 0x02]);
        assert!(matches!(result, Err(DeserializeError::Decode(_))));
    }

    // -----------------------------------------------------------------------
    // Test 5: JSON export is human-readable
    // -----------------------------------------------------------------------
    #[cfg(feature = "json-export")]
    #[test]
    fn json_export_mentions_kinds() {
        let supplier = sample_supplier();
        let snapshot = snapshot_frames(&supplier);
        let json = to_json(&snapshot).unwrap();
        assert!(json.contains("UseItemOnBlock"), "got: {json}");
        assert!(json.contains("Ignition"), "got: {json}");
    }
}
