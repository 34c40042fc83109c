//! Authentication and account-recovery handlers.
//!
//! The recovery endpoints answer 204 whether or not an account matched, so
//! they cannot be used to probe for registered addresses.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::debug;

use carehub_auth::TokenPair;
use carehub_core::result::AppResult;
use carehub_service::account::AccountProfile;

use crate::dto::request::{
    EmailRequest, LoginRequest, PasswordResetConfirmRequest, RefreshRequest,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthContext, Meta, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Meta(meta): Meta,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<TokenPair>>> {
    let tokens = state
        .account_service
        .login(&meta, &req.username, &req.password)
        .await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<TokenPair>>> {
    let tokens = state.account_service.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> ApiResult<Json<ApiResponse<AccountProfile>>> {
    let profile = state.account_service.profile(&ctx.identity).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// POST /api/auth/password-reset/request
pub async fn request_password_reset(
    State(state): State<AppState>,
    Meta(meta): Meta,
    ValidatedJson(req): ValidatedJson<EmailRequest>,
) -> ApiResult<StatusCode> {
    let outcome = state
        .recovery_service
        .request_password_reset(&meta, &req.email)
        .await;
    suppress_not_found(outcome, "password reset request")?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/password-reset/confirm
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Meta(meta): Meta,
    ValidatedJson(req): ValidatedJson<PasswordResetConfirmRequest>,
) -> ApiResult<StatusCode> {
    let outcome = state
        .recovery_service
        .confirm_password_reset(&meta, &req.token, &req.new_password)
        .await;
    suppress_not_found(outcome, "password reset confirmation")?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/username-reminder
pub async fn username_reminder(
    State(state): State<AppState>,
    Meta(meta): Meta,
    ValidatedJson(req): ValidatedJson<EmailRequest>,
) -> ApiResult<StatusCode> {
    let outcome = state.recovery_service.remind_username(&meta, &req.email).await;
    suppress_not_found(outcome, "username reminder")?;
    Ok(StatusCode::NO_CONTENT)
}

/// Turn a not-found outcome into success, logging the cause at `debug`.
fn suppress_not_found(outcome: AppResult<()>, flow: &str) -> AppResult<()> {
    match outcome {
        Err(err) if err.is_not_found() => {
            debug!(flow, reason = %err.message, "Suppressed not-found outcome");
            Ok(())
        }
        other => other,
    }
}
