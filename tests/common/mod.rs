//! Common test helpers for integration tests.
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate, and not every file uses every
//! helper.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use task_tracker::api::{AppState, create_router};
use task_tracker::domain::{Task, TaskId};

// =============================================================================
// Fixtures
// =============================================================================

/// The three tasks every handler test starts from.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task::new(TaskId::new(1), "Clean the carpet", false),
        Task::new(TaskId::new(2), "Pick up the groceries", false),
        Task::new(TaskId::new(123), "Doctor's appointment", true),
    ]
}

/// JSON for [`seed_tasks`] as the list endpoint returns it.
pub const SEED_TASKS_JSON: &str = r#"[{"id":1,"title":"Clean the carpet","completed":false},{"id":2,"title":"Pick up the groceries","completed":false},{"id":123,"title":"Doctor's appointment","completed":true}]"#;

/// Creates an `AppState` seeded with [`seed_tasks`].
pub fn seeded_state() -> AppState {
    AppState::with_tasks(seed_tasks())
}

/// Creates an `AppState` with an empty store.
pub fn empty_state() -> AppState {
    AppState::with_tasks(Vec::new())
}

// =============================================================================
// Request Helpers
// =============================================================================

/// A response with its body collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Sends one request through `router` and collects the response.
///
/// Requests with a body are sent as `application/json`.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let content_type = body.map(|_| "application/json");
    send_with_content_type(router, method, uri, content_type, body).await
}

/// Like [`send`], with an explicit `Content-Type` (or none).
pub async fn send_with_content_type(
    router: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |json| Body::from(json.to_string())))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// Builds the router around `state`.
pub fn router(state: AppState) -> Router {
    create_router(state)
}
