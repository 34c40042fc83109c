//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let (status, database) = match &state.database {
        None => ("ok", "memory"),
        Some(pool) if pool.ping().await => ("ok", "connected"),
        Some(_) => ("degraded", "unreachable"),
    };

    Json(ApiResponse::ok(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
    }))
}
