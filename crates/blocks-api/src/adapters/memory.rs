//! In-process marker store.
//!
//! Keeps marker documents in memory with the same semantics as a bucket:
//! the block must be known, and an existing marker is never overwritten.

use crate::ports::outbound::{BlockMarker, MarkerError, SystemTimeSource, TimeSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{BlockId, DeletionMark, NoCompactMark, NoCompactReason};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Default)]
struct Marks {
    deletion: HashMap<BlockId, DeletionMark>,
    no_compact: HashMap<BlockId, NoCompactMark>,
}

/// [`BlockMarker`] backed by process memory.
pub struct InMemoryMarker {
    known: RwLock<HashSet<BlockId>>,
    marks: RwLock<Marks>,
    time_source: Arc<dyn TimeSource>,
}

impl Default for InMemoryMarker {
    fn default() -> Self {
        Self::new(Arc::new(SystemTimeSource))
    }
}

impl InMemoryMarker {
    pub fn new(time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            known: RwLock::new(HashSet::new()),
            marks: RwLock::new(Marks::default()),
            time_source,
        }
    }

    /// Make blocks markable.
    pub fn register_blocks(&self, ids: impl IntoIterator<Item = BlockId>) {
        self.known.write().extend(ids);
    }

    pub fn deletion_mark(&self, id: &BlockId) -> Option<DeletionMark> {
        self.marks.read().deletion.get(id).cloned()
    }

    pub fn no_compact_mark(&self, id: &BlockId) -> Option<NoCompactMark> {
        self.marks.read().no_compact.get(id).cloned()
    }

    fn ensure_known(&self, id: BlockId) -> Result<(), MarkerError> {
        if self.known.read().contains(&id) {
            Ok(())
        } else {
            Err(MarkerError::BlockNotFound(id))
        }
    }
}

#[async_trait]
impl BlockMarker for InMemoryMarker {
    async fn mark_for_deletion(&self, id: BlockId, details: &str) -> Result<(), MarkerError> {
        self.ensure_known(id)?;
        let now = self.time_source.now().timestamp();

        let mut marks = self.marks.write();
        if marks.deletion.contains_key(&id) {
            warn!(block = %id, "requested to mark for deletion, but marker already exists");
            return Ok(());
        }
        marks.deletion.insert(id, DeletionMark::new(id, details, now));
        info!(block = %id, "block has been marked for deletion");
        Ok(())
    }

    async fn mark_for_no_compact(
        &self,
        id: BlockId,
        reason: NoCompactReason,
        details: &str,
    ) -> Result<(), MarkerError> {
        self.ensure_known(id)?;
        let now = self.time_source.now().timestamp();

        let mut marks = self.marks.write();
        if marks.no_compact.contains_key(&id) {
            warn!(block = %id, "requested to mark for no compaction, but marker already exists");
            return Ok(());
        }
        marks
            .no_compact
            .insert(id, NoCompactMark::new(id, reason, details, now));
        info!(block = %id, %reason, "block has been marked for no compaction");
        Ok(())
    }
}
