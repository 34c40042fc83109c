//! Account provisioning.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use carehub_service::account::AccountProfile;

use crate::dto::request::CreateAccountBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthContext, ValidatedJson};
use crate::state::AppState;

/// POST /api/accounts
pub async fn create_account(
    State(state): State<AppState>,
    ctx: AuthContext,
    ValidatedJson(body): ValidatedJson<CreateAccountBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AccountProfile>>)> {
    let profile = state
        .account_service
        .create_account(&ctx, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}
