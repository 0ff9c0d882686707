//! Task Tracker API
//!
//! An HTTP service for managing a to-do list, persisted to a JSON file.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (e.g., `info`, `task_tracker=debug`)
//! - `HOST`: Server host address (default: `127.0.0.1`)
//! - `PORT`: Server port (default: `8000`)
//! - `TASKS_FILE`: Path of the task file (default: `tasks.json`)
//! - `SHUTDOWN_TIMEOUT_SECS`: Grace period for in-flight requests (default: `10`)
//! - `AUTOSAVE_INTERVAL_SECS`: Periodic save interval; unset or `0` disables it

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_tracker::infrastructure::{AppConfig, TaskStore};
use task_tracker::server::Server;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_tracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Task Tracker API");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    tracing::info!(
        address = %config.socket_addr(),
        tasks_file = %config.tasks_file.display(),
        "Configuration loaded"
    );

    let server = Server::new(config, Arc::new(TaskStore::new()));

    match server.load_tasks() {
        Ok(count) => tracing::info!(count, "Tasks loaded"),
        Err(error) => {
            tracing::error!("Failed to load tasks: {}", error);
            std::process::exit(1);
        }
    }

    if let Err(error) = server.run().await {
        tracing::error!("{}", error);
        std::process::exit(1);
    }
}
