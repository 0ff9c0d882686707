//! Routing definitions for the task API.

use axum::Router;
use axum::handler::Handler;
use axum::routing::{get, put};
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_task, delete_task, health_check, list_tasks, method_not_allowed, update_task,
};
use super::middleware::{JsonContentTypeLayer, ResponseTimeLayer};

/// Creates the API router with all routes and middleware.
///
/// | Method | Path | Handler |
/// |---|---|---|
/// | GET | `/health` | [`health_check`] |
/// | GET | `/tasks` | [`list_tasks`] |
/// | POST | `/tasks` | [`create_task`] |
/// | PUT | `/tasks/{id}` | [`update_task`] |
/// | DELETE | `/tasks/{id}` | [`delete_task`] |
///
/// POST and PUT require `Content-Type: application/json` and answer 415
/// otherwise. Any other method on the task routes answers 405 with a JSON
/// error.
/// Paths outside these routes answer 404.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/tasks",
            get(list_tasks)
                .post(create_task.layer(JsonContentTypeLayer::new()))
                .fallback(method_not_allowed),
        )
        .route(
            "/tasks/{*path}",
            put(update_task.layer(JsonContentTypeLayer::new()))
                .delete(delete_task)
                .fallback(method_not_allowed),
        )
        .layer(ResponseTimeLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
