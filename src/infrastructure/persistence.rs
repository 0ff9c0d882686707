//! File-backed persistence for the task store.
//!
//! The task collection is stored as a two-space-indented JSON array. Each
//! save first renames the existing file to a `.bak` sibling, so the
//! previous version survives one more checkpoint. A failed rename is logged
//! and the save carries on with the primary write.
//!
//! # Example
//!
//! ```no_run
//! use task_tracker::infrastructure::{TaskFile, TaskStore};
//!
//! let store = TaskStore::new();
//! let file = TaskFile::new("tasks.json");
//!
//! file.load(&store)?;
//! store.create("Write report", false).unwrap();
//! file.save(&store)?;
//! # Ok::<(), task_tracker::infrastructure::PersistenceError>(())
//! ```

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{Task, TaskId};
use crate::infrastructure::TaskStore;

/// Suffix appended to the task file name for the backup copy.
pub const BACKUP_SUFFIX: &str = ".bak";

// =============================================================================
// Persistence Error
// =============================================================================

/// Errors that can occur while loading or saving the task file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The file could not be opened, read, created or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a JSON array of tasks.
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file contains a task with identifier zero.
    #[error("Task ID 0 in {path} is not a positive integer")]
    InvalidId { path: PathBuf },

    /// The file lists the same task identifier more than once.
    #[error("Duplicate task ID {id} in {path}")]
    DuplicateId { path: PathBuf, id: TaskId },

    /// The in-memory collection could not be encoded.
    #[error("Failed to encode tasks: {0}")]
    Encode(#[source] serde_json::Error),
}

// =============================================================================
// Task File
// =============================================================================

/// A task file on disk together with its `.bak` sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFile {
    path: PathBuf,
}

impl TaskFile {
    /// Creates a handle for the task file at `path`. Nothing is touched on disk.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the primary file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path of the backup file (`<path>.bak`).
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Returns true if the primary file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads and decodes the task file without touching any store.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file cannot be read,
    /// [`PersistenceError::Decode`] if it is not a JSON array of tasks,
    /// [`PersistenceError::InvalidId`] if an identifier is zero, and
    /// [`PersistenceError::DuplicateId`] if an identifier repeats.
    pub fn read(&self) -> Result<Vec<Task>, PersistenceError> {
        let contents = fs::read(&self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;

        let tasks: Vec<Task> =
            serde_json::from_slice(&contents).map_err(|source| PersistenceError::Decode {
                path: self.path.clone(),
                source,
            })?;

        if tasks.iter().any(|task| task.id == TaskId::default()) {
            return Err(PersistenceError::InvalidId {
                path: self.path.clone(),
            });
        }

        let mut seen = HashSet::with_capacity(tasks.len());
        if let Some(duplicate) = tasks.iter().find(|task| !seen.insert(task.id)) {
            return Err(PersistenceError::DuplicateId {
                path: self.path.clone(),
                id: duplicate.id,
            });
        }

        Ok(tasks)
    }

    /// Loads the task file into `store`, replacing its contents and
    /// recomputing the identifier counter. Returns the number of tasks loaded.
    ///
    /// The store is left untouched if anything fails.
    ///
    /// # Errors
    ///
    /// See [`TaskFile::read`].
    pub fn load(&self, store: &TaskStore) -> Result<usize, PersistenceError> {
        let tasks = self.read()?;
        let count = tasks.len();
        store.replace(tasks);

        tracing::info!(path = %self.path.display(), count, "Tasks loaded");
        Ok(count)
    }

    /// Writes `tasks` to the primary file, rotating any existing file to the
    /// backup path first.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file cannot be created or
    /// written. A failed backup rename is logged, not returned.
    pub fn write(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let contents = serde_json::to_vec_pretty(tasks).map_err(PersistenceError::Encode)?;

        if self.path.exists() {
            let backup = self.backup_path();
            if let Err(error) = fs::rename(&self.path, &backup) {
                tracing::warn!(
                    %error,
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "Failed to create backup, continuing with save"
                );
            }
        }

        fs::write(&self.path, contents).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Saves a snapshot of `store`.
    ///
    /// The store lock is only held while the snapshot is taken.
    ///
    /// # Errors
    ///
    /// See [`TaskFile::write`].
    pub fn save(&self, store: &TaskStore) -> Result<(), PersistenceError> {
        let tasks = store.list();
        self.write(&tasks)?;

        tracing::info!(path = %self.path.display(), count = tasks.len(), "Tasks saved");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
