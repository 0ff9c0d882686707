//! Infrastructure layer: the task store, its file persistence, and
//! runtime configuration.

pub mod config;
pub mod persistence;
pub mod store;

pub use config::{AppConfig, ConfigurationError};
pub use persistence::{PersistenceError, TaskFile};
pub use store::{StoreError, TaskStore};
