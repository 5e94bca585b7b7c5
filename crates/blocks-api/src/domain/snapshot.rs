//! # Block Inventory Snapshots
//!
//! A [`Snapshot`] is the cached state of one block inventory. A
//! [`GuardedView`] owns one snapshot behind its own lock.
//!
//! ## Invariants
//!
//! - `blocks` always holds the result of the last *successful* refresh. A
//!   failed refresh only moves `refreshed_at` and records `last_error`.
//! - `replace` is atomic with respect to `read`: a reader sees either the
//!   whole previous snapshot or the whole new one.

use crate::domain::errors::RefreshError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::BlockMeta;
use std::sync::Arc;

/// Point-in-time copy of one block inventory.
///
/// The block list is shared behind an `Arc`, so copies are cheap and a
/// holder can never change what the view caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Display name of the view.
    pub label: String,
    /// Blocks from the last successful refresh, in refresher order.
    pub blocks: Arc<Vec<BlockMeta>>,
    /// Time of the last refresh attempt, `None` before the first one.
    #[serde(rename = "refreshedAt")]
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Error of the last refresh attempt, `None` if it succeeded.
    #[serde(rename = "err")]
    pub last_error: Option<String>,
}

impl Snapshot {
    /// Empty snapshot that has never been refreshed.
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            blocks: Arc::new(Vec::new()),
            refreshed_at: None,
            last_error: None,
        }
    }

    /// Whether no refresh has been attempted yet.
    pub fn is_pristine(&self) -> bool {
        self.refreshed_at.is_none()
    }
}

/// A snapshot with its own lock.
///
/// Views never share a lock, so a slow reader of one inventory cannot delay
/// a refresh of another.
#[derive(Debug)]
pub struct GuardedView {
    snapshot: RwLock<Snapshot>,
}

impl GuardedView {
    /// Create an empty view.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            snapshot: RwLock::new(Snapshot::empty(label)),
        }
    }

    /// Copy of the current snapshot.
    pub fn read(&self) -> Snapshot {
        self.snapshot.read().clone()
    }

    /// Store the outcome of a refresh attempt made at `at`.
    ///
    /// On `Ok` the blocks are swapped in and the error cleared. On `Err` the
    /// cached blocks stay as they are.
    pub fn replace(&self, outcome: Result<Vec<BlockMeta>, RefreshError>, at: DateTime<Utc>) {
        self.store(outcome, at, false);
    }

    /// Like [`replace`](Self::replace), but drops the outcome when the view
    /// already holds one stamped later than `at`. Returns whether it was
    /// stored.
    ///
    /// For attempts stamped when they start, so a slow attempt finishing
    /// last cannot overwrite a newer one.
    pub fn replace_if_newer(
        &self,
        outcome: Result<Vec<BlockMeta>, RefreshError>,
        at: DateTime<Utc>,
    ) -> bool {
        self.store(outcome, at, true)
    }

    fn store(
        &self,
        outcome: Result<Vec<BlockMeta>, RefreshError>,
        at: DateTime<Utc>,
        only_newer: bool,
    ) -> bool {
        let outcome = outcome.map(Arc::new);

        let previous = {
            let mut snapshot = self.snapshot.write();
            if only_newer && snapshot.refreshed_at.is_some_and(|current| current > at) {
                return false;
            }

            snapshot.refreshed_at = Some(at);
            match outcome {
                Ok(blocks) => {
                    snapshot.last_error = None;
                    Some(std::mem::replace(&mut snapshot.blocks, blocks))
                }
                Err(err) => {
                    snapshot.last_error = Some(err.to_string());
                    None
                }
            }
        };

        // Last reference to a large inventory is released outside the lock.
        drop(previous);
        true
    }

    /// Label the view was created with.
    pub fn label(&self) -> String {
        self.snapshot.read().label.clone()
    }
}
