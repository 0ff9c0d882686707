//! API error handling.
//!
//! Every handler failure is turned into a JSON body of the form
//! `{"error": "<message>"}` with a matching status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::path::RoutingError;
use crate::infrastructure::StoreError;

/// Message for a request body that is not valid task JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format";
/// Message for a request body that could not be read.
pub const UNREADABLE_BODY_MESSAGE: &str = "Failed to read request body";
/// Message for an unsupported HTTP method.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";
/// Message for a request body that is not declared as JSON.
pub const UNSUPPORTED_MEDIA_TYPE_MESSAGE: &str = "Unsupported Media Type";
/// Message for a response that could not be encoded.
pub const SERIALIZATION_FAILED_MESSAGE: &str = "Internal server error: JSON marshalling failed";

// =============================================================================
// API Error
// =============================================================================

/// API error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}

impl ApiError {
    /// Creates a new API error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

/// API error response containing status code and error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a new API error response.
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    /// Creates a 400 Bad Request response.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::new(message))
    }

    /// Creates a 400 response for a body that is not valid task JSON.
    #[must_use]
    pub fn invalid_json() -> Self {
        Self::bad_request(INVALID_JSON_MESSAGE)
    }

    /// Creates a 400 response for a body that could not be read.
    #[must_use]
    pub fn unreadable_body() -> Self {
        Self::bad_request(UNREADABLE_BODY_MESSAGE)
    }

    /// Creates a 404 Not Found response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiError::new(message))
    }

    /// Creates a 405 Method Not Allowed response.
    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            ApiError::new(METHOD_NOT_ALLOWED_MESSAGE),
        )
    }

    /// Creates a 415 Unsupported Media Type response.
    #[must_use]
    pub fn unsupported_media_type() -> Self {
        Self::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::new(UNSUPPORTED_MEDIA_TYPE_MESSAGE),
        )
    }

    /// Creates a 500 Internal Server Error response.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(message))
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.error.error, "Request failed");
        } else {
            tracing::warn!(status = %self.status, error = %self.error.error, "Request rejected");
        }
        (self.status, Json(self.error)).into_response()
    }
}

impl From<StoreError> for ApiErrorResponse {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::EmptyTitle => Self::bad_request(error.to_string()),
            StoreError::NotFound(_) => Self::not_found(error.to_string()),
            StoreError::IdsExhausted => Self::internal_error(error.to_string()),
        }
    }
}

impl From<RoutingError> for ApiErrorResponse {
    fn from(error: RoutingError) -> Self {
        Self::bad_request(error.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
