//! Test doubles and fixtures.

use crate::ports::outbound::{BlockMarker, MarkerError, PlanError, Planner, TimeSource};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use shared_types::{
    BlockCompaction, BlockId, BlockMeta, BlockStats, Downsample, NoCompactReason, ThanosMeta,
    META_VERSION_1,
};
use std::collections::BTreeMap;

/// A well-formed block ULID.
pub const VALID_ID: &str = "01EEB0ZRSQDJW51W11V4R6YP4T";

pub fn valid_id() -> BlockId {
    BlockId::from_string(VALID_ID).unwrap()
}

/// Deterministic level-1 block; `seed` orders the ULIDs.
pub fn sample_meta(seed: u64) -> BlockMeta {
    let min_time = 1_594_629_445_222 + seed as i64 * 7_200_000;
    BlockMeta {
        ulid: BlockId::from_parts(min_time as u64, seed as u128),
        min_time,
        max_time: min_time + 7_200_000,
        stats: BlockStats {
            num_samples: 1_000 * seed,
            num_series: 10,
            num_chunks: 100,
            num_tombstones: 0,
        },
        compaction: BlockCompaction {
            level: 1,
            ..Default::default()
        },
        version: META_VERSION_1,
        thanos: ThanosMeta {
            version: 1,
            labels: BTreeMap::from([("monitor".to_string(), "test".to_string())]),
            downsample: Downsample { resolution: 0 },
            source: "sidecar".to_string(),
        },
    }
}

pub fn sample_metas(n: usize) -> Vec<BlockMeta> {
    (0..n as u64).map(sample_meta).collect()
}

/// Clock that only moves when told to.
pub struct FixedTimeSource {
    now: Mutex<DateTime<Utc>>,
}

impl FixedTimeSource {
    pub fn at(secs: i64) -> Self {
        Self {
            now: Mutex::new(Utc.timestamp_opt(secs, 0).unwrap()),
        }
    }

    pub fn advance(&self, secs: i64) {
        *self.now.lock() += Duration::seconds(secs);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// One call received by [`RecordingMarker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkCall {
    Deletion {
        id: BlockId,
        details: String,
    },
    NoCompact {
        id: BlockId,
        reason: NoCompactReason,
        details: String,
    },
}

/// Marker that records calls and optionally fails them.
#[derive(Default)]
pub struct RecordingMarker {
    calls: Mutex<Vec<MarkCall>>,
    failure: Option<String>,
}

impl RecordingMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker whose every call fails with a bucket error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    pub fn calls(&self) -> Vec<MarkCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: MarkCall, path: String) -> Result<(), MarkerError> {
        self.calls.lock().push(call);
        match &self.failure {
            Some(message) => Err(MarkerError::Bucket {
                operation: "upload file",
                path,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BlockMarker for RecordingMarker {
    async fn mark_for_deletion(&self, id: BlockId, details: &str) -> Result<(), MarkerError> {
        self.record(
            MarkCall::Deletion {
                id,
                details: details.to_string(),
            },
            format!("{id}/deletion-mark.json"),
        )
    }

    async fn mark_for_no_compact(
        &self,
        id: BlockId,
        reason: NoCompactReason,
        details: &str,
    ) -> Result<(), MarkerError> {
        self.record(
            MarkCall::NoCompact {
                id,
                reason,
                details: details.to_string(),
            },
            format!("{id}/no-compact-mark.json"),
        )
    }
}

/// Planner returning a scripted outcome and remembering its input size.
pub struct ScriptedPlanner {
    outcome: Mutex<Result<Vec<BlockMeta>, String>>,
    last_input_len: Mutex<Option<usize>>,
}

impl ScriptedPlanner {
    pub fn returning(metas: Vec<BlockMeta>) -> Self {
        Self {
            outcome: Mutex::new(Ok(metas)),
            last_input_len: Mutex::new(None),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Mutex::new(Err(message.into())),
            last_input_len: Mutex::new(None),
        }
    }

    pub fn set_outcome(&self, outcome: Result<Vec<BlockMeta>, String>) {
        *self.outcome.lock() = outcome;
    }

    pub fn last_input_len(&self) -> Option<usize> {
        *self.last_input_len.lock()
    }
}

#[async_trait]
impl Planner for ScriptedPlanner {
    async fn plan(&self, metas: &[BlockMeta]) -> Result<Vec<BlockMeta>, PlanError> {
        *self.last_input_len.lock() = Some(metas.len());
        self.outcome.lock().clone().map_err(PlanError::Failed)
    }
}
