//! API module for HTTP handlers.
//!
//! This module contains route definitions and request/response handlers.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod json;
pub mod middleware;
pub mod path;
pub mod routes;

pub use dto::{DeleteResponse, TaskRequest, TaskResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use handlers::{
    AppState, HealthResponse, create_task, delete_task, health_check, list_tasks,
    method_not_allowed, update_task,
};
pub use json::{JsonResponse, JsonResponseWithStatus};
pub use path::{RoutingError, TaskPath};
pub use routes::create_router;
