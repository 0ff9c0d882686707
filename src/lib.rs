//! # task-tracker
//!
//! A small HTTP service for managing a to-do list.
//!
//! Tasks live in memory behind a single lock and are saved to a JSON file
//! on shutdown (and optionally on a fixed interval). The API exposes the
//! usual list, create, update and delete operations under `/tasks`.
//!
//! ## Layout
//!
//! - [`domain`]: the task value type
//! - [`infrastructure`]: the task store, the task file and configuration
//! - [`api`]: HTTP handlers, request and response types, routing
//! - [`server`]: startup, graceful shutdown and saving
//!
//! ## Example
//!
//! ```rust
//! use task_tracker::infrastructure::TaskStore;
//!
//! let store = TaskStore::new();
//! let task = store.create("Write the report", false).unwrap();
//!
//! assert_eq!(task.id.value(), 1);
//! assert_eq!(store.list().len(), 1);
//! ```

pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod server;
