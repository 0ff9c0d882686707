//! Data Transfer Objects for API requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Task;

// =============================================================================
// Task DTOs
// =============================================================================

/// Request body for creating or updating a task.
///
/// Both fields may be omitted or `null`: a missing title is rejected by
/// validation, a missing `completed` flag means `false`. Unknown fields
/// (including a client-supplied `id`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskRequest {
    /// Title of the task.
    #[serde(default)]
    pub title: Option<String>,
    /// Completion flag.
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TaskRequest {
    /// Decodes a request body.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `body` is not a JSON object with
    /// the expected field types.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("expected a JSON object"));
        }
        serde_json::from_value(value)
    }

    /// Splits the request into the title (empty if absent) and flag.
    #[must_use]
    pub fn into_parts(self) -> (String, bool) {
        (
            self.title.unwrap_or_default(),
            self.completed.unwrap_or_default(),
        )
    }
}

/// Response body for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task ID.
    pub id: u64,
    /// Title of the task.
    pub title: String,
    /// Whether the task is done.
    pub completed: bool,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.value(),
            title: task.title.clone(),
            completed: task.completed,
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.value(),
            title: task.title,
            completed: task.completed,
        }
    }
}

/// Response body for a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `"success"`.
    pub status: String,
    /// Human-readable confirmation.
    pub message: String,
}

impl DeleteResponse {
    /// The body returned after a task is deleted.
    #[must_use]
    pub fn deleted() -> Self {
        Self {
            status: "success".to_string(),
            message: "Task deleted".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
