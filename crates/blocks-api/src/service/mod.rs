//! # Blocks Service
//!
//! The service implementing [`BlocksApi`].
//!
//! ## Architecture
//!
//! This service:
//! 1. Owns three independent views: global, loaded and planned
//! 2. Accepts refresh outcomes from an external refresher
//! 3. Runs mark requests through the [`MarkDispatcher`]
//! 4. Uses dependency injection for marker, planner and clock
//!
//! No call path holds more than one view lock, and no lock is held across
//! an `.await`.

mod dispatcher;

pub use dispatcher::MarkDispatcher;

use crate::domain::action::MarkRequest;
use crate::domain::config::BlocksApiConfig;
use crate::domain::errors::{MarkError, RefreshError};
use crate::domain::snapshot::{GuardedView, Snapshot};
use crate::ports::inbound::{BlocksApi, LOADED_VIEW};
use crate::ports::outbound::{BlockMarker, Planner, TimeSource};
use async_trait::async_trait;
use shared_types::BlockMeta;
use std::sync::Arc;
use tracing::{debug, warn};

/// Label of the planned view.
pub const PLANNED_LABEL: &str = "Planned Blocks";

/// External dependencies of [`BlocksService`].
pub struct BlocksDependencies {
    /// Marker writer used by the mark endpoint.
    pub marker: Arc<dyn BlockMarker>,
    /// Compaction planner feeding the planned view.
    pub planner: Arc<dyn Planner>,
    /// Clock stamping refreshes.
    pub time_source: Arc<dyn TimeSource>,
}

/// The Blocks Service.
pub struct BlocksService {
    global: GuardedView,
    loaded: GuardedView,
    planned: GuardedView,
    dispatcher: MarkDispatcher,
    planner: Arc<dyn Planner>,
    time_source: Arc<dyn TimeSource>,
    config: BlocksApiConfig,
}

impl BlocksService {
    /// Create a service with empty views.
    pub fn new(deps: BlocksDependencies, config: BlocksApiConfig) -> Self {
        Self {
            global: GuardedView::new(config.label.clone()),
            loaded: GuardedView::new(config.label.clone()),
            planned: GuardedView::new(PLANNED_LABEL),
            dispatcher: MarkDispatcher::new(deps.marker),
            planner: deps.planner,
            time_source: deps.time_source,
            config,
        }
    }

    pub fn config(&self) -> &BlocksApiConfig {
        &self.config
    }

    fn store(&self, view: &GuardedView, name: &str, outcome: Result<Vec<BlockMeta>, RefreshError>) {
        if let Err(e) = &outcome {
            warn!(view = name, error = %e, "refresh failed; keeping last good blocks");
        }
        view.replace(outcome, self.time_source.now());
    }
}

#[async_trait]
impl BlocksApi for BlocksService {
    fn blocks(&self, view: Option<&str>) -> Snapshot {
        // Unknown selectors fall back to the global view.
        match view {
            Some(LOADED_VIEW) => self.loaded.read(),
            _ => self.global.read(),
        }
    }

    fn planned_blocks(&self) -> Snapshot {
        self.planned.read()
    }

    async fn plan_blocks(&self) -> Snapshot {
        // Stamped before planning: of two overlapping runs, the one that
        // started last wins regardless of which finishes last.
        let started = self.time_source.now();
        let current = self.global.read();
        let outcome = self
            .planner
            .plan(&current.blocks)
            .await
            .map_err(RefreshError::new);

        if let Err(e) = &outcome {
            warn!(view = "planned", error = %e, "plan failed; keeping last plan");
        }
        if !self.planned.replace_if_newer(outcome, started) {
            debug!("plan superseded by a newer run; dropped");
        }
        self.planned.read()
    }

    async fn mark(&self, request: &MarkRequest) -> Result<(), MarkError> {
        self.dispatcher
            .mark(request, self.config.disable_admin_operations)
            .await
    }

    fn set_global(&self, outcome: Result<Vec<BlockMeta>, RefreshError>) {
        self.store(&self.global, "global", outcome);
    }

    fn set_loaded(&self, outcome: Result<Vec<BlockMeta>, RefreshError>) {
        self.store(&self.loaded, LOADED_VIEW, outcome);
    }
}
