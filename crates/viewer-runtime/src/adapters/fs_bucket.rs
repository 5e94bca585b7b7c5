//! # Directory Bucket
//!
//! A bucket laid out on a local filesystem: one directory per block, named
//! by its ULID, holding `meta.json` and optional marker files.
//!
//! Marker writes go through a temporary file and a rename so a reader never
//! sees a half-written marker.

use async_trait::async_trait;
use blocks_api::{BlockMarker, MarkerError, SystemTimeSource, TimeSource};
use shared_types::{
    BlockId, BlockMeta, DeletionMark, NoCompactMark, NoCompactReason, DELETION_MARK_FILENAME,
    META_FILENAME, NO_COMPACT_MARK_FILENAME,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Bucket listing failures.
#[derive(Debug, Error)]
pub enum BucketError {
    #[error("list bucket {}: {source}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Filesystem-backed bucket.
pub struct FsBucket {
    root: PathBuf,
    time_source: Arc<dyn TimeSource>,
}

impl FsBucket {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_time_source(root, Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(root: impl Into<PathBuf>, time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            root: root.into(),
            time_source,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All readable block metas, ordered by ULID.
    ///
    /// Entries that are not ULID directories are ignored. Blocks without a
    /// `meta.json` (partial uploads) or with a corrupt one are skipped.
    pub async fn list_metas(&self) -> Result<Vec<BlockMeta>, BucketError> {
        let list_err = |source| BucketError::List {
            path: self.root.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(list_err)?;
        let mut metas = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Ok(id) = BlockId::from_string(name) else {
                debug!(entry = name, "skipping non-block entry");
                continue;
            };

            if let Some(meta) = self.read_meta(id).await {
                metas.push(meta);
            }
        }

        metas.sort_by_key(|meta| meta.ulid);
        Ok(metas)
    }

    async fn read_meta(&self, id: BlockId) -> Option<BlockMeta> {
        let path = self.block_path(id, META_FILENAME);
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(block = %id, "block without meta.json, likely a partial upload");
                return None;
            }
            Err(e) => {
                warn!(block = %id, error = %e, "read meta.json");
                return None;
            }
        };

        match BlockMeta::from_json(&data) {
            Ok(meta) if meta.ulid == id => Some(meta),
            Ok(meta) => {
                warn!(block = %id, meta_ulid = %meta.ulid, "meta.json ulid does not match directory");
                None
            }
            Err(e) => {
                warn!(block = %id, error = %e, "corrupted meta.json");
                None
            }
        }
    }

    fn block_path(&self, id: BlockId, file: &str) -> PathBuf {
        self.root.join(id.to_string()).join(file)
    }

    async fn exists(&self, id: BlockId, file: &str) -> Result<bool, MarkerError> {
        tokio::fs::try_exists(self.block_path(id, file))
            .await
            .map_err(|e| MarkerError::Bucket {
                operation: "check exists",
                path: format!("{id}/{file}"),
                message: e.to_string(),
            })
    }

    async fn ensure_block(&self, id: BlockId) -> Result<(), MarkerError> {
        if self.exists(id, META_FILENAME).await? {
            Ok(())
        } else {
            Err(MarkerError::BlockNotFound(id))
        }
    }

    async fn upload(&self, id: BlockId, file: &str, data: &[u8]) -> Result<(), MarkerError> {
        let target = self.block_path(id, file);
        let tmp = target.with_extension("json.tmp");

        let result = async {
            tokio::fs::write(&tmp, data).await?;
            tokio::fs::rename(&tmp, &target).await
        }
        .await;

        result.map_err(|e| MarkerError::Bucket {
            operation: "upload file",
            path: format!("{id}/{file}"),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl BlockMarker for FsBucket {
    async fn mark_for_deletion(&self, id: BlockId, details: &str) -> Result<(), MarkerError> {
        self.ensure_block(id).await?;
        if self.exists(id, DELETION_MARK_FILENAME).await? {
            warn!(
                block = %id,
                "requested to mark for deletion, but file already exists; this should not happen; investigate"
            );
            return Ok(());
        }

        let mark = DeletionMark::new(id, details, self.time_source.now().timestamp());
        let data = serde_json::to_vec_pretty(&mark)?;
        self.upload(id, DELETION_MARK_FILENAME, &data).await?;

        info!(block = %id, "block has been marked for deletion");
        Ok(())
    }

    async fn mark_for_no_compact(
        &self,
        id: BlockId,
        reason: NoCompactReason,
        details: &str,
    ) -> Result<(), MarkerError> {
        self.ensure_block(id).await?;
        if self.exists(id, NO_COMPACT_MARK_FILENAME).await? {
            warn!(
                block = %id,
                "requested to mark for no compaction, but file already exists; this should not happen; investigate"
            );
            return Ok(());
        }

        let mark = NoCompactMark::new(id, reason, details, self.time_source.now().timestamp());
        let data = serde_json::to_vec_pretty(&mark)?;
        self.upload(id, NO_COMPACT_MARK_FILENAME, &data).await?;

        info!(block = %id, %reason, "block has been marked for no compaction");
        Ok(())
    }
}
