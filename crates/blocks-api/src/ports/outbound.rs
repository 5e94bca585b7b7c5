//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the blocks service needs from its host.
//!
//! - [`BlockMarker`]: writes deletion and no-compaction markers to the bucket
//! - [`Planner`]: proposes the next compaction plan
//! - [`TimeSource`]: wall clock for refresh stamps
//!
//! Marker and planner calls do I/O; they are `async` and are cancelled by
//! dropping the future. The service never holds a view lock across them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{BlockId, BlockMeta, NoCompactReason};
use thiserror::Error;

/// Writes markers next to blocks in the bucket.
///
/// Production: `FsBucket` (viewer-runtime/adapters/fs_bucket.rs)
/// Testing: `InMemoryMarker` (adapters/memory.rs)
#[async_trait]
pub trait BlockMarker: Send + Sync {
    /// Flag a block for deletion.
    async fn mark_for_deletion(&self, id: BlockId, details: &str) -> Result<(), MarkerError>;

    /// Exclude a block from future compactions.
    async fn mark_for_no_compact(
        &self,
        id: BlockId,
        reason: NoCompactReason,
        details: &str,
    ) -> Result<(), MarkerError>;
}

/// Marker writer failures.
#[derive(Debug, Error)]
pub enum MarkerError {
    /// The block has no `meta.json` in the bucket.
    #[error("block {0} not found in bucket")]
    BlockNotFound(BlockId),

    /// Marker document could not be encoded.
    #[error("encode marker: {0}")]
    Encode(#[from] serde_json::Error),

    /// A bucket call failed.
    #[error("{operation} {path} in bucket: {message}")]
    Bucket {
        operation: &'static str,
        path: String,
        message: String,
    },
}

/// Computes which blocks should be compacted next.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Plan over the current global inventory.
    async fn plan(&self, metas: &[BlockMeta]) -> Result<Vec<BlockMeta>, PlanError>;
}

/// Planner failures.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("planner unavailable: {0}")]
    Unavailable(String),

    #[error("plan failed: {0}")]
    Failed(String),
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
