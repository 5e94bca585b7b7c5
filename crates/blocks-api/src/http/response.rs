//! JSON response envelope.
//!
//! ```text
//! {"status": "success", "data": ...}
//! {"status": "error", "errorType": "bad_data", "error": "..."}
//! ```

use crate::domain::errors::{ApiError, ErrorType};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Response body of every API endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            error_type: None,
            error: None,
        }
    }

    /// Success without a payload.
    pub fn empty() -> Self {
        Self {
            status: Status::Success,
            data: None,
            error_type: None,
            error: None,
        }
    }
}

impl Envelope<()> {
    pub fn failure(err: &ApiError) -> Self {
        Self {
            status: Status::Error,
            data: None,
            error_type: Some(err.error_type),
            error: Some(err.message.clone()),
        }
    }
}

impl ErrorType {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorType::BadData => StatusCode::BAD_REQUEST,
            ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(error_type = %self.error_type, error = %self.message, "api request failed");
        (self.error_type.status_code(), Json(Envelope::failure(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let value = serde_json::to_value(Envelope::success(vec![1, 2])).unwrap();
        assert_eq!(value, serde_json::json!({"status": "success", "data": [1, 2]}));
    }

    #[test]
    fn test_empty_success_omits_data() {
        let value = serde_json::to_value(Envelope::<()>::empty()).unwrap();
        assert_eq!(value, serde_json::json!({"status": "success"}));
    }

    #[test]
    fn test_failure_shape() {
        let err = ApiError::bad_data("ID cannot be empty");
        let value = serde_json::to_value(Envelope::failure(&err)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status": "error",
                "errorType": "bad_data",
                "error": "ID cannot be empty"
            })
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorType::BadData.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorType::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorType::Unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
