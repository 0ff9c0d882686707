//! Task domain model.
//!
//! A task is the only entity tracked by the service: an identifier assigned
//! by the store, a title, and a completion flag.

use serde::{Deserialize, Serialize};

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Unique identifier for a task.
///
/// Identifiers are positive integers assigned by the store in strictly
/// increasing order and are never reused after a task is deleted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a `TaskId` from a raw integer.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one, or `None` once the
    /// integer range is used up.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

// =============================================================================
// Task Entity
// =============================================================================

/// A tracked task.
///
/// Field order is part of the wire contract: tasks always serialize as
/// `{"id":..,"title":..,"completed":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned by the store.
    pub id: TaskId,
    /// Title of the task. Never blank once stored.
    pub title: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates a new task.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
        }
    }
}

/// Returns true if the title is empty or contains only whitespace.
#[must_use]
pub fn is_blank_title(title: &str) -> bool {
    title.trim().is_empty()
}

// =============================================================================
// Tests
// =============================================================================
