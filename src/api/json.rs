//! JSON response bodies.
//!
//! [`JsonResponse`] and [`JsonResponseWithStatus`] serialize their payload
//! with `serde_json` and set `Content-Type: application/json`. If encoding
//! fails the client gets a 500 with the standard error body instead of a
//! truncated or plain-text response.

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::error::{ApiErrorResponse, SERIALIZATION_FAILED_MESSAGE};

/// Serializes `value` into a JSON response with the given status.
fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(bytes) => {
            let mut response = (status, Body::from(bytes)).into_response();
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(error) => {
            tracing::error!(%error, "JSON serialization failed");
            ApiErrorResponse::internal_error(SERIALIZATION_FAILED_MESSAGE).into_response()
        }
    }
}

// =============================================================================
// JsonResponse
// =============================================================================

/// JSON response with status 200 OK.
#[derive(Debug)]
pub struct JsonResponse<T>(pub T);

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        json_response(StatusCode::OK, &self.0)
    }
}

/// JSON response with a custom status code.
#[derive(Debug)]
pub struct JsonResponseWithStatus<T> {
    status: StatusCode,
    body: T,
}

impl<T> JsonResponseWithStatus<T> {
    /// Creates a new response with the given status code and body.
    pub const fn new(status: StatusCode, body: T) -> Self {
        Self { status, body }
    }

    /// Creates a 201 Created response.
    pub const fn created(body: T) -> Self {
        Self::new(StatusCode::CREATED, body)
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the body.
    pub const fn body(&self) -> &T {
        &self.body
    }
}

impl<T: Serialize> IntoResponse for JsonResponseWithStatus<T> {
    fn into_response(self) -> Response {
        json_response(self.status, &self.body)
    }
}

// =============================================================================
// Tests
// =============================================================================
