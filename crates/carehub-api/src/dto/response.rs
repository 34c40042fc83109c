//! Success envelopes. Errors use the body built in `crate::error`.

use serde::Serialize;

/// `{"success": true, "data": ...}` around every 200 and 201 body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Unread counters and bulk-update tallies.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database does not answer a ping.
    pub status: &'static str,
    pub version: &'static str,
    /// `connected`, `unreachable`, or `memory` without a pool.
    pub database: &'static str,
}
