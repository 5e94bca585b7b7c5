//! # Mark Dispatcher
//!
//! Validates a mark request and routes it to the marker writer.
//!
//! Validation order, first failure wins:
//!
//! 1. admin operations disabled
//! 2. empty id
//! 3. empty action
//! 4. id is not a ULID
//! 5. action is not recognized
//!
//! The marker writer is only called once all checks pass.

use crate::domain::action::{ActionKind, MarkRequest};
use crate::domain::errors::MarkError;
use crate::ports::outbound::BlockMarker;
use shared_types::{BlockId, NoCompactReason};
use std::sync::Arc;
use tracing::{debug, info};

/// Routes validated mark requests to a [`BlockMarker`].
pub struct MarkDispatcher {
    marker: Arc<dyn BlockMarker>,
}

impl MarkDispatcher {
    pub fn new(marker: Arc<dyn BlockMarker>) -> Self {
        Self { marker }
    }

    /// Validate `request` and write the requested marker.
    pub async fn mark(&self, request: &MarkRequest, admin_disabled: bool) -> Result<(), MarkError> {
        let id = Self::validate(request, admin_disabled).inspect_err(|e| {
            debug!(id = %request.id, action = %request.action, error = %e, "mark request rejected");
        })?;

        match ActionKind::classify(&request.action) {
            ActionKind::Deletion => {
                self.marker.mark_for_deletion(id, &request.detail).await?;
            }
            ActionKind::NoCompaction => {
                self.marker
                    .mark_for_no_compact(id, NoCompactReason::Manual, &request.detail)
                    .await?;
            }
            ActionKind::Unknown => {
                debug!(id = %request.id, action = %request.action, "unsupported mark action");
                return Err(MarkError::UnsupportedAction(request.action.clone()));
            }
        }

        info!(block = %id, action = %request.action, detail = %request.detail, "block marked");
        Ok(())
    }

    /// Checks that do not depend on the action kind.
    fn validate(request: &MarkRequest, admin_disabled: bool) -> Result<BlockId, MarkError> {
        if admin_disabled {
            return Err(MarkError::AdminOperationsDisabled);
        }
        if request.id.is_empty() {
            return Err(MarkError::MissingIdentifier);
        }
        if request.action.is_empty() {
            return Err(MarkError::MissingAction);
        }

        BlockId::from_string(&request.id).map_err(|reason| MarkError::InvalidIdentifier {
            id: request.id.clone(),
            reason,
        })
    }
}
