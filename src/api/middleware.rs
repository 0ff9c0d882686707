//! Request middleware.
//!
//! - [`ResponseTimeLayer`] measures how long each request takes, logs the
//!   method, path, status and duration, and adds an `x-response-time` header
//!   to the response.
//! - [`JsonContentTypeLayer`] answers 415 to requests whose body is not
//!   declared as `application/json`.

use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::header::{self, HeaderName};
use axum::http::{HeaderMap, HeaderValue, Request, Response};
use axum::response::IntoResponse;
use futures::future::BoxFuture;
use tower::{Layer, Service};

use super::error::ApiErrorResponse;

/// The header name for response time (in milliseconds).
pub static RESPONSE_TIME_HEADER: HeaderName = HeaderName::from_static("x-response-time");

// =============================================================================
// ResponseTimeLayer
// =============================================================================

/// Layer that measures and logs request durations.
///
/// ```ignore
/// use task_tracker::api::middleware::ResponseTimeLayer;
///
/// let app = Router::new()
///     .route("/tasks", get(list_tasks))
///     .layer(ResponseTimeLayer::new());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseTimeLayer;

impl ResponseTimeLayer {
    /// Creates a new `ResponseTimeLayer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<InnerService> Layer<InnerService> for ResponseTimeLayer {
    type Service = ResponseTimeService<InnerService>;

    fn layer(&self, inner: InnerService) -> Self::Service {
        ResponseTimeService { inner }
    }
}

// =============================================================================
// ResponseTimeService
// =============================================================================

/// Service that handles response time measurement.
#[derive(Debug, Clone)]
pub struct ResponseTimeService<InnerService> {
    inner: InnerService,
}

impl<InnerService, RequestBody, ResponseBody> Service<Request<RequestBody>>
    for ResponseTimeService<InnerService>
where
    InnerService:
        Service<Request<RequestBody>, Response = Response<ResponseBody>> + Clone + Send + 'static,
    InnerService::Future: Send,
    RequestBody: Send + 'static,
    ResponseBody: Send + 'static,
{
    type Response = Response<ResponseBody>;
    type Error = InnerService::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, context: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(context)
    }

    fn call(&mut self, request: Request<RequestBody>) -> Self::Future {
        let start = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        // Take the service that was driven to readiness and leave a clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut response = inner.call(request).await?;

            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

            if let Ok(header_value) = HeaderValue::from_str(&format!("{elapsed_ms:.2}ms")) {
                response
                    .headers_mut()
                    .insert(RESPONSE_TIME_HEADER.clone(), header_value);
            }

            tracing::info!(
                method = %method,
                path = %path,
                status = %response.status(),
                response_time_ms = elapsed_ms,
                "Handled request"
            );

            Ok(response)
        })
    }
}

// =============================================================================
// JsonContentTypeLayer
// =============================================================================

/// Layer that rejects requests without a JSON `Content-Type`.
///
/// Attach it to the handlers that read a body rather than to a whole route,
/// so unsupported methods still answer 405:
///
/// ```ignore
/// use axum::handler::Handler;
///
/// let app = Router::new()
///     .route("/tasks", post(create_task.layer(JsonContentTypeLayer::new())));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonContentTypeLayer;

impl JsonContentTypeLayer {
    /// Creates a new `JsonContentTypeLayer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<InnerService> Layer<InnerService> for JsonContentTypeLayer {
    type Service = JsonContentTypeService<InnerService>;

    fn layer(&self, inner: InnerService) -> Self::Service {
        JsonContentTypeService { inner }
    }
}

/// Service that checks the request `Content-Type`.
#[derive(Debug, Clone)]
pub struct JsonContentTypeService<InnerService> {
    inner: InnerService,
}

/// Returns true if the media type is `application/json`, ignoring
/// parameters such as `charset`.
fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
}

impl<InnerService, RequestBody> Service<Request<RequestBody>>
    for JsonContentTypeService<InnerService>
where
    InnerService: Service<Request<RequestBody>, Response = axum::response::Response>
        + Clone
        + Send
        + 'static,
    InnerService::Future: Send,
    RequestBody: Send + 'static,
{
    type Response = axum::response::Response;
    type Error = InnerService::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, context: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(context)
    }

    fn call(&mut self, request: Request<RequestBody>) -> Self::Future {
        if !declares_json(request.headers()) {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request without JSON content type"
            );
            let response = ApiErrorResponse::unsupported_media_type().into_response();
            return Box::pin(async move { Ok(response) });
        }

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move { inner.call(request).await })
    }
}

// =============================================================================
// Tests
// =============================================================================
