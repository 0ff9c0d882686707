//! HTTP handlers for the task API.
//!
//! Handlers read and decode the request body before calling into the
//! store, so the store lock is never held while waiting on the client.
//! Validation always happens before any mutation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::BytesRejection},
};
use bytes::Bytes;

use super::dto::{DeleteResponse, TaskRequest, TaskResponse};
use super::error::ApiErrorResponse;
use super::json::{JsonResponse, JsonResponseWithStatus};
use super::path::TaskPath;
use crate::domain::Task;
use crate::infrastructure::TaskStore;

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The task store.
    pub store: Arc<TaskStore>,
}

impl AppState {
    /// Creates a new `AppState` around a shared store.
    #[must_use]
    pub const fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }

    /// Creates a new `AppState` with a store seeded from `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self::new(Arc::new(TaskStore::with_tasks(tasks)))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Turns the raw body extraction result into a decoded task request.
fn decode_task_request(body: Result<Bytes, BytesRejection>) -> Result<TaskRequest, ApiErrorResponse> {
    let body = body.map_err(|rejection| {
        tracing::debug!(%rejection, "Failed to read request body");
        ApiErrorResponse::unreadable_body()
    })?;

    TaskRequest::from_slice(&body).map_err(|error| {
        tracing::debug!(%error, "Invalid JSON in request body");
        ApiErrorResponse::invalid_json()
    })
}

// =============================================================================
// GET /tasks
// =============================================================================

/// Lists all tasks in insertion order.
///
/// # Response
///
/// - **200 OK**: JSON array of tasks (`[]` when empty)
pub async fn list_tasks(State(state): State<AppState>) -> JsonResponse<Vec<TaskResponse>> {
    let tasks = state.store.list();
    JsonResponse(tasks.into_iter().map(TaskResponse::from).collect())
}

// =============================================================================
// POST /tasks
// =============================================================================

/// Creates a new task.
///
/// # Request Body
///
/// ```json
/// { "title": "Task title", "completed": false }
/// ```
///
/// # Response
///
/// - **201 Created**: the created task
/// - **400 Bad Request**: unreadable body, invalid JSON, or empty title
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] with status 400 for any of the above.
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<JsonResponseWithStatus<TaskResponse>, ApiErrorResponse> {
    let (title, completed) = decode_task_request(body)?.into_parts();

    let task = state.store.create(title, completed)?;
    tracing::info!(task_id = %task.id, "Created task");

    Ok(JsonResponseWithStatus::created(TaskResponse::from(task)))
}

// =============================================================================
// PUT /tasks/{id}
// =============================================================================

/// Replaces the title and completion flag of a task.
///
/// The identifier is parsed before the body is read.
///
/// # Response
///
/// - **200 OK**: the updated task
/// - **400 Bad Request**: invalid URL, invalid ID, invalid JSON, empty title
/// - **404 Not Found**: no task with that ID
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] with the status listed above.
pub async fn update_task(
    State(state): State<AppState>,
    TaskPath(id): TaskPath,
    body: Result<Bytes, BytesRejection>,
) -> Result<JsonResponse<TaskResponse>, ApiErrorResponse> {
    let (title, completed) = decode_task_request(body)?.into_parts();

    let task = state.store.update(id, title, completed)?;
    tracing::info!(task_id = %task.id, "Updated task");

    Ok(JsonResponse(TaskResponse::from(task)))
}

// =============================================================================
// DELETE /tasks/{id}
// =============================================================================

/// Deletes a task.
///
/// # Response
///
/// - **200 OK**: `{"status":"success","message":"Task deleted"}`
/// - **400 Bad Request**: invalid URL or ID
/// - **404 Not Found**: no task with that ID
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] with the status listed above.
pub async fn delete_task(
    State(state): State<AppState>,
    TaskPath(id): TaskPath,
) -> Result<JsonResponse<DeleteResponse>, ApiErrorResponse> {
    state.store.delete(id)?;
    tracing::info!(task_id = %id, "Deleted task");

    Ok(JsonResponse(DeleteResponse::deleted()))
}

// =============================================================================
// Unsupported Methods
// =============================================================================

/// Fallback for methods a task route does not support.
pub async fn method_not_allowed() -> ApiErrorResponse {
    ApiErrorResponse::method_not_allowed()
}

// =============================================================================
// GET /health
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// ```json
/// { "status": "healthy", "version": "0.1.0" }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Tests
// =============================================================================
