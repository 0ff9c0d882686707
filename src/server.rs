//! Server lifecycle.
//!
//! [`Server`] ties the store, its task file and the router together:
//!
//! 1. [`Server::load_tasks`] seeds the store from the task file.
//! 2. [`Server::run`] binds the listener and serves until Ctrl+C or SIGTERM.
//! 3. On shutdown, new connections are refused and in-flight requests get
//!    up to the configured timeout to finish. After the timeout only the
//!    accept loop is aborted: connection tasks already spawned keep running
//!    until the runtime stops, and a mutation they make after the final save
//!    is not persisted.
//! 4. The store is saved one last time. A failed save is logged and
//!    shutdown still completes.
//!
//! When an autosave interval is configured, a background task also saves
//! the store periodically. It is stopped, and any save in progress awaited,
//! before the final save runs, so the file never has two writers.

use std::future::Future;
use std::io;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::{AppState, create_router};
use crate::infrastructure::{AppConfig, PersistenceError, TaskFile, TaskStore};

// =============================================================================
// Server Error
// =============================================================================

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server loop failed.
    #[error("Server error: {0}")]
    Serve(#[source] io::Error),
}

// =============================================================================
// Server
// =============================================================================

/// The task tracker server.
#[derive(Debug)]
pub struct Server {
    config: AppConfig,
    store: Arc<TaskStore>,
    task_file: TaskFile,
}

impl Server {
    /// Creates a server around `store`, persisting to `config.tasks_file`.
    #[must_use]
    pub fn new(config: AppConfig, store: Arc<TaskStore>) -> Self {
        let task_file = TaskFile::new(config.tasks_file.clone());
        Self {
            config,
            store,
            task_file,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the task file.
    #[must_use]
    pub const fn task_file(&self) -> &TaskFile {
        &self.task_file
    }

    /// Seeds the store from the task file. Returns the number of tasks loaded.
    ///
    /// A missing file is not an error: the store stays empty and the file is
    /// created by the first save.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the file exists but cannot be read or
    /// decoded.
    pub fn load_tasks(&self) -> Result<usize, PersistenceError> {
        if !self.task_file.exists() {
            tracing::info!(
                path = %self.task_file.path().display(),
                "Task file not found, starting with an empty task list"
            );
            return Ok(0);
        }
        self.task_file.load(&self.store)
    }

    /// Binds the configured address and serves until a shutdown signal.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if binding fails or the server loop fails.
    pub async fn run(self) -> Result<(), ServerError> {
        let address = self.config.socket_addr();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind { address, source })?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on `listener` until `shutdown` completes, then drains
    /// in-flight requests and saves the store.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`] if the server loop fails before
    /// shutdown was requested. The final save still runs in that case.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        match listener.local_addr() {
            Ok(address) => tracing::info!("Listening on http://{}", address),
            Err(error) => tracing::warn!(%error, "Could not determine local address"),
        }

        let router = create_router(AppState::new(Arc::clone(&self.store)));
        let autosave = self.start_autosave();

        let (drain_sender, drain_receiver) = oneshot::channel::<()>();
        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            let _ = drain_receiver.await;
        });
        let mut serving = tokio::spawn(async move { server.await });

        let outcome = tokio::select! {
            joined = &mut serving => flatten_join(joined),
            () = shutdown => {
                let _ = drain_sender.send(());
                match tokio::time::timeout(self.config.shutdown_timeout, &mut serving).await {
                    Ok(joined) => flatten_join(joined),
                    Err(_) => {
                        tracing::warn!(
                            timeout = ?self.config.shutdown_timeout,
                            "In-flight requests did not finish in time, closing connections"
                        );
                        serving.abort();
                        Ok(())
                    }
                }
            }
        };

        if let Some(autosave) = autosave {
            autosave.stop().await;
        }

        if save_snapshot(self.task_file.clone(), Arc::clone(&self.store)).await {
            tracing::info!("Final save complete");
        } else {
            tracing::error!("Final save failed, shutting down anyway");
        }

        tracing::info!("Server shutdown complete");
        outcome
    }

    fn start_autosave(&self) -> Option<Autosave> {
        let interval = self.config.autosave_interval?;
        tracing::info!(interval = ?interval, "Autosave enabled");
        Some(Autosave::start(
            interval,
            self.task_file.clone(),
            Arc::clone(&self.store),
        ))
    }
}

/// Collapses the join result of the serving task into a server result.
fn flatten_join(
    joined: Result<io::Result<()>, tokio::task::JoinError>,
) -> Result<(), ServerError> {
    match joined {
        Ok(result) => result.map_err(ServerError::Serve),
        Err(error) => {
            tracing::error!(%error, "Server task ended abnormally");
            Ok(())
        }
    }
}

/// Saves `store` on the blocking pool. Returns true on success.
async fn save_snapshot(task_file: TaskFile, store: Arc<TaskStore>) -> bool {
    match tokio::task::spawn_blocking(move || task_file.save(&store)).await {
        Ok(Ok(())) => true,
        Ok(Err(error)) => {
            tracing::error!(%error, "Failed to save tasks");
            false
        }
        Err(error) => {
            tracing::error!(%error, "Save task ended abnormally");
            false
        }
    }
}

// =============================================================================
// Autosave
// =============================================================================

/// Background task that saves the store on a fixed interval.
struct Autosave {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Autosave {
    fn start(interval: std::time::Duration, task_file: TaskFile, store: Arc<TaskStore>) -> Self {
        let (stop, mut stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        save_snapshot(task_file.clone(), Arc::clone(&store)).await;
                    }
                }
            }
        });

        Self { stop, handle }
    }

    /// Stops the loop and waits for any save in progress.
    async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(error) = self.handle.await {
            tracing::warn!(%error, "Autosave task ended abnormally");
        }
    }
}

// =============================================================================
// Shutdown Signal
// =============================================================================

/// Handles graceful shutdown signals (SIGINT, SIGTERM).
///
/// On Unix systems it listens for both SIGINT (Ctrl+C) and SIGTERM. On
/// other systems it only listens for Ctrl+C.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
