//! # Block Metadata Entities
//!
//! The `meta.json` document written next to every block.

use crate::errors::MetaError;
use crate::BlockId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// File name of the block metadata document.
pub const META_FILENAME: &str = "meta.json";

/// The only supported `meta.json` format version.
pub const META_VERSION_1: u32 = 1;

/// Metadata of one immutable block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMeta {
    /// Unique identifier of the block.
    pub ulid: BlockId,
    /// Inclusive lower bound of samples in the block, milliseconds.
    pub min_time: i64,
    /// Exclusive upper bound of samples in the block, milliseconds.
    pub max_time: i64,
    #[serde(default)]
    pub stats: BlockStats,
    #[serde(default)]
    pub compaction: BlockCompaction,
    /// Format version of the document.
    pub version: u32,
    /// Bucket-level annotations (external labels, resolution, producer).
    #[serde(default)]
    pub thanos: ThanosMeta,
}

impl BlockMeta {
    /// Decode a `meta.json` document, rejecting unknown format versions.
    pub fn from_json(data: &[u8]) -> Result<Self, MetaError> {
        let meta: BlockMeta = serde_json::from_slice(data)?;
        if meta.version != META_VERSION_1 {
            return Err(MetaError::UnsupportedVersion(meta.version));
        }
        Ok(meta)
    }

    /// Encode as pretty-printed JSON, the way blocks are uploaded.
    pub fn to_json(&self) -> Result<Vec<u8>, MetaError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Time span covered by the block in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.max_time - self.min_time
    }
}

/// Sample, series and chunk counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStats {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub num_samples: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub num_series: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub num_chunks: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub num_tombstones: u64,
}

/// Compaction lineage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCompaction {
    /// Number of compaction rounds the block went through (1 = fresh).
    pub level: u32,
    /// ULIDs of all level-1 blocks this block was built from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<BlockId>,
    /// Direct parents merged into this block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<BlockDesc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deletable: bool,
}

/// Short description of a parent block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDesc {
    pub ulid: BlockId,
    pub min_time: i64,
    pub max_time: i64,
}

/// Bucket-level section of `meta.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThanosMeta {
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub version: u32,
    /// External labels identifying the producer of the block.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub downsample: Downsample,
    /// Component that uploaded the block (`sidecar`, `compactor`, ...).
    #[serde(default)]
    pub source: String,
}

/// Downsampling resolution in milliseconds; 0 means raw data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Downsample {
    pub resolution: i64,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}
