//! # Blocks API Errors
//!
//! - [`MarkError`]: why a mark request was refused or failed.
//! - [`RefreshError`]: failed refresh attempt, stored on the affected view.
//! - [`ApiError`]: what the HTTP layer sends back, with an error type that
//!   decides the status code.

use crate::ports::outbound::MarkerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Mark request failures, in validation order.
#[derive(Debug, Error)]
pub enum MarkError {
    /// Admin operations are switched off by configuration.
    #[error("Admin operations are disabled")]
    AdminOperationsDisabled,

    #[error("ID cannot be empty")]
    MissingIdentifier,

    #[error("Action cannot be empty")]
    MissingAction,

    /// The identifier is not a ULID.
    #[error("ULID {id:?} is not valid: {reason}")]
    InvalidIdentifier {
        id: String,
        #[source]
        reason: ulid::DecodeError,
    },

    /// The action text is not a recognized kind. Carries the text as sent.
    #[error("not supported marker {0}")]
    UnsupportedAction(String),

    /// The marker writer failed.
    #[error(transparent)]
    MarkOperationFailed(#[from] MarkerError),
}

impl MarkError {
    /// Whether the request was rejected before any marker was touched.
    pub fn is_validation(&self) -> bool {
        !matches!(self, MarkError::MarkOperationFailed(_))
    }
}

/// A failed refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RefreshError {
    message: String,
}

impl RefreshError {
    pub fn new(cause: impl fmt::Display) -> Self {
        Self {
            message: cause.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error classes of the JSON API envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Client sent something unusable. 400.
    BadData,
    /// Server-side failure. 500.
    Internal,
    /// Dependency not ready. 503.
    Unavailable,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorType::BadData => "bad_data",
            ErrorType::Internal => "internal",
            ErrorType::Unavailable => "unavailable",
        };
        f.write_str(text)
    }
}

/// API error returned by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub error_type: ErrorType,
    pub message: String,
}

impl ApiError {
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }

    pub fn bad_data(message: impl Into<String>) -> Self {
        Self::new(ErrorType::BadData, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Internal, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Unavailable, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_type, self.message)
    }
}

impl std::error::Error for ApiError {}

// Marker failures are reported as bad data too; there is no separate
// server-error class for the mark endpoint.
impl From<MarkError> for ApiError {
    fn from(e: MarkError) -> Self {
        ApiError::bad_data(e.to_string())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::BlockId;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            MarkError::AdminOperationsDisabled.to_string(),
            "Admin operations are disabled"
        );
        assert_eq!(MarkError::MissingIdentifier.to_string(), "ID cannot be empty");
        assert_eq!(MarkError::MissingAction.to_string(), "Action cannot be empty");
        assert_eq!(
            MarkError::UnsupportedAction("DELETE".into()).to_string(),
            "not supported marker DELETE"
        );
    }

    #[test]
    fn test_invalid_identifier_message_carries_text_and_reason() {
        let reason = BlockId::from_string("not-a-valid-id").unwrap_err();
        let err = MarkError::InvalidIdentifier {
            id: "not-a-valid-id".into(),
            reason,
        };
        let message = err.to_string();
        assert!(message.starts_with("ULID \"not-a-valid-id\" is not valid: "));
        assert!(message.len() > "ULID \"not-a-valid-id\" is not valid: ".len());
    }

    #[test]
    fn test_marker_failure_is_not_validation() {
        let id = BlockId::from_string("01EEB0ZRSQDJW51W11V4R6YP4T").unwrap();
        let err = MarkError::from(MarkerError::BlockNotFound(id));
        assert!(!err.is_validation());
        assert!(MarkError::MissingAction.is_validation());
        assert!(err.to_string().contains("01EEB0ZRSQDJW51W11V4R6YP4T"));
    }

    #[test]
    fn test_mark_errors_map_to_bad_data() {
        let api: ApiError = MarkError::AdminOperationsDisabled.into();
        assert_eq!(api.error_type, ErrorType::BadData);
        assert_eq!(api.message, "Admin operations are disabled");
    }

    #[test]
    fn test_error_type_wire_names() {
        assert_eq!(serde_json::to_value(ErrorType::BadData).unwrap(), "bad_data");
        assert_eq!(ErrorType::BadData.to_string(), "bad_data");
        assert_eq!(ErrorType::Unavailable.to_string(), "unavailable");
    }
}
