//! Per-request deadline.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use carehub_core::error::AppError;

use crate::error::ApiError;

/// Fail with 503 when the handler does not finish within `limit`.
pub async fn request_timeout(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%path, limit_ms = limit.as_millis(), "Request timed out");
            ApiError(AppError::service_unavailable("Request timed out")).into_response()
        }
    }
}
