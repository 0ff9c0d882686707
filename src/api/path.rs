//! Task identifier extraction from `/tasks/{id}` paths.
//!
//! The item route is registered as a catch-all (`/tasks/{*path}`) so that
//! malformed shapes reach [`TaskPath`] and are reported as routing errors
//! rather than falling through to a plain 404. The path is cleaned first:
//! empty and `.` segments are dropped and `..` removes the preceding
//! segment, so `/tasks/7/` and `/tasks/./7` both address task 7.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use thiserror::Error;

use super::error::ApiErrorResponse;
use crate::domain::TaskId;

/// Collection segment that must precede the identifier.
const COLLECTION_SEGMENT: &str = "tasks";

// =============================================================================
// Routing Error
// =============================================================================

/// Errors raised while extracting a task identifier from the path.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoutingError {
    /// The path is not `tasks` followed by exactly one identifier segment.
    #[error("Invalid URL")]
    InvalidUrl,

    /// The identifier segment is not a positive integer.
    #[error("Invalid Task ID")]
    InvalidTaskId,
}

// =============================================================================
// Parsing
// =============================================================================

/// Splits `path` into segments, resolving `.`, `..` and repeated slashes.
fn clean_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments
}

/// Parses a raw identifier segment as a positive integer.
///
/// # Errors
///
/// Returns [`RoutingError::InvalidTaskId`] for anything else.
pub fn parse_task_id(raw: &str) -> Result<TaskId, RoutingError> {
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(TaskId::new(value)),
        _ => Err(RoutingError::InvalidTaskId),
    }
}

/// Parses the part of the path that follows `/tasks/`.
///
/// # Errors
///
/// Returns [`RoutingError::InvalidUrl`] if the cleaned path is not exactly
/// `tasks/{id}`, or [`RoutingError::InvalidTaskId`] if `{id}` is not a
/// positive integer.
pub fn parse_task_path(rest: &str) -> Result<TaskId, RoutingError> {
    let full = format!("{COLLECTION_SEGMENT}/{rest}");
    match clean_segments(&full).as_slice() {
        [COLLECTION_SEGMENT, id] => parse_task_id(id),
        _ => Err(RoutingError::InvalidUrl),
    }
}

// =============================================================================
// TaskPath Extractor
// =============================================================================

/// Extractor for the task identifier of a `/tasks/{*path}` route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPath(pub TaskId);

impl<S> FromRequestParts<S> for TaskPath
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(rest) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiErrorResponse::from(RoutingError::InvalidUrl))?;

        parse_task_path(&rest)
            .map(Self)
            .map_err(ApiErrorResponse::from)
    }
}

// =============================================================================
// Tests
// =============================================================================
