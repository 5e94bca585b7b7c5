//! # Block Markers
//!
//! Documents written next to a block to flag it for deletion or to exclude
//! it from compaction. A marker never changes the block itself.

use crate::BlockId;
use serde::{Deserialize, Serialize};

/// File name of the deletion marker.
pub const DELETION_MARK_FILENAME: &str = "deletion-mark.json";

/// File name of the no-compaction marker.
pub const NO_COMPACT_MARK_FILENAME: &str = "no-compact-mark.json";

/// Current version of both marker formats.
pub const MARKER_VERSION_1: u32 = 1;

/// Deletion marker. The block is removed after the configured delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionMark {
    pub id: BlockId,
    pub version: u32,
    pub details: String,
    /// Unix seconds when the block was marked.
    pub deletion_time: i64,
}

impl DeletionMark {
    pub fn new(id: BlockId, details: impl Into<String>, deletion_time: i64) -> Self {
        Self {
            id,
            version: MARKER_VERSION_1,
            details: details.into(),
            deletion_time,
        }
    }
}

/// Why a block was excluded from compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoCompactReason {
    /// Requested by an operator.
    Manual,
    /// Compacting would produce an index above the size limit.
    IndexSizeExceeding,
}

impl std::fmt::Display for NoCompactReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoCompactReason::Manual => write!(f, "manual"),
            NoCompactReason::IndexSizeExceeding => write!(f, "index-size-exceeding"),
        }
    }
}

/// No-compaction marker. Compactors skip blocks carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoCompactMark {
    pub id: BlockId,
    pub version: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
    /// Unix seconds when the block was marked.
    pub no_compact_time: i64,
    pub reason: NoCompactReason,
}

impl NoCompactMark {
    pub fn new(
        id: BlockId,
        reason: NoCompactReason,
        details: impl Into<String>,
        no_compact_time: i64,
    ) -> Self {
        Self {
            id,
            version: MARKER_VERSION_1,
            details: details.into(),
            no_compact_time,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> BlockId {
        BlockId::from_string("01EEB0ZRSQDJW51W11V4R6YP4T").unwrap()
    }

    #[test]
    fn test_deletion_mark_wire_format() {
        let mark = DeletionMark::new(id(), "spam", 1_600_000_000);
        let value = serde_json::to_value(&mark).unwrap();
        assert_eq!(value["id"], "01EEB0ZRSQDJW51W11V4R6YP4T");
        assert_eq!(value["version"], 1);
        assert_eq!(value["details"], "spam");
        assert_eq!(value["deletion_time"], 1_600_000_000);
    }

    #[test]
    fn test_no_compact_mark_wire_format() {
        let mark = NoCompactMark::new(id(), NoCompactReason::Manual, "", 42);
        let value = serde_json::to_value(&mark).unwrap();
        assert_eq!(value["reason"], "manual");
        assert_eq!(value["no_compact_time"], 42);
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_reason_display_matches_wire() {
        for reason in [NoCompactReason::Manual, NoCompactReason::IndexSizeExceeding] {
            let wire = serde_json::to_value(reason).unwrap();
            assert_eq!(wire, reason.to_string());
        }
    }
}
