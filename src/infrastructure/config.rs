//! Runtime configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `HOST`: Server host address (default: `127.0.0.1`)
//! - `PORT`: Server port (default: `8000`)
//! - `TASKS_FILE`: Path of the persisted task file (default: `tasks.json`)
//! - `SHUTDOWN_TIMEOUT_SECS`: Upper bound for draining in-flight requests on
//!   shutdown (default: `10`)
//! - `AUTOSAVE_INTERVAL_SECS`: Periodic save interval; unset or `0` disables
//!   autosave

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default listen host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;
/// Default task file path.
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";
/// Default graceful shutdown timeout.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Configuration Error
// =============================================================================

/// Errors that can occur while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A variable was present but could not be parsed.
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A variable was present but empty where a value is required.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Path of the persisted task file.
    pub tasks_file: PathBuf,
    /// How long in-flight requests may take to drain on shutdown.
    pub shutdown_timeout: Duration,
    /// Interval for periodic saves, if enabled.
    pub autosave_interval: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            tasks_file: PathBuf::from(DEFAULT_TASKS_FILE),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            autosave_interval: None,
        }
    }
}

impl AppConfig {
    /// Creates a configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Creates a configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset, except for `TASKS_FILE` which must
    /// name a file when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |name: &str| lookup(name).map(|raw| raw.trim().to_string());

        let host = value("HOST")
            .filter(|host| !host.is_empty())
            .unwrap_or(defaults.host);

        let port = parse_number("PORT", value("PORT"))?.unwrap_or(defaults.port);

        let tasks_file = match value("TASKS_FILE") {
            Some(path) if path.is_empty() => return Err(ConfigurationError::Empty("TASKS_FILE")),
            Some(path) => PathBuf::from(path),
            None => defaults.tasks_file,
        };

        let shutdown_timeout =
            parse_number::<u64>("SHUTDOWN_TIMEOUT_SECS", value("SHUTDOWN_TIMEOUT_SECS"))?
                .map_or(defaults.shutdown_timeout, Duration::from_secs);

        let autosave_interval =
            parse_number::<u64>("AUTOSAVE_INTERVAL_SECS", value("AUTOSAVE_INTERVAL_SECS"))?
                .filter(|seconds| *seconds > 0)
                .map(Duration::from_secs);

        Ok(Self {
            host,
            port,
            tasks_file,
            shutdown_timeout,
            autosave_interval,
        })
    }

    /// Returns the `host:port` string to bind.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses an optional numeric variable, treating blank as unset.
fn parse_number<T>(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigurationError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|error: T::Err| ConfigurationError::InvalidValue {
                name,
                value: raw,
                reason: error.to_string(),
            }),
    }
}

// =============================================================================
// Tests
// =============================================================================
