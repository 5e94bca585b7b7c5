//! # Inbound Port (Driving Port)
//!
//! The API exposed to HTTP handlers and to the background refresher.

use crate::domain::action::MarkRequest;
use crate::domain::errors::{MarkError, RefreshError};
use crate::domain::snapshot::Snapshot;
use async_trait::async_trait;
use shared_types::BlockMeta;

/// View selector value that picks the locally loaded inventory.
pub const LOADED_VIEW: &str = "loaded";

/// Blocks API.
#[async_trait]
pub trait BlocksApi: Send + Sync {
    /// Snapshot of the view named by `view`.
    ///
    /// `Some("loaded")` selects the loaded view. Every other value, including
    /// `None` and unknown names, selects the global view.
    fn blocks(&self, view: Option<&str>) -> Snapshot;

    /// Last stored compaction plan.
    fn planned_blocks(&self) -> Snapshot;

    /// Run the planner over the global view and store its outcome.
    ///
    /// Overlapping runs resolve by start time; a run that started earlier
    /// never replaces the plan of one that started later.
    async fn plan_blocks(&self) -> Snapshot;

    /// Validate a mark request and write the marker.
    ///
    /// Cached views are not touched; the mark shows up after the next
    /// refresh.
    async fn mark(&self, request: &MarkRequest) -> Result<(), MarkError>;

    /// Store a refresh outcome for the global view.
    fn set_global(&self, outcome: Result<Vec<BlockMeta>, RefreshError>);

    /// Store a refresh outcome for the loaded view.
    fn set_loaded(&self, outcome: Result<Vec<BlockMeta>, RefreshError>);
}
