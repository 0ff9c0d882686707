//! Domain layer for the task tracker.
//!
//! This module contains the task entity and its value objects.

pub mod task;

pub use task::{Task, TaskId, is_blank_title};
