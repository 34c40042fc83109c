//! Feature flag handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use carehub_core::types::PageResponse;
use carehub_entity::feature_flag::FeatureFlag;
use carehub_service::feature_flag::{FlagEvaluation, SetFlagRequest};

use crate::dto::query::FlagScopeQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{
    AuthContext, JsonBody, OptionalHospitalContext, PaginationParams, QueryParams,
};
use crate::state::AppState;

/// GET /api/feature-flags
pub async fn list_flags(
    State(state): State<AppState>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<FeatureFlag>>>> {
    let result = state
        .feature_flag_service
        .list(&page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// PUT /api/feature-flags/{key}
pub async fn set_flag(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(key): Path<String>,
    JsonBody(req): JsonBody<SetFlagRequest>,
) -> ApiResult<Json<ApiResponse<FeatureFlag>>> {
    let flag = state.feature_flag_service.set(&ctx, &key, req).await?;
    Ok(Json(ApiResponse::ok(flag)))
}

/// DELETE /api/feature-flags/{key}?hospitalId=
///
/// Without `hospitalId` the global value is removed.
pub async fn delete_flag(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(key): Path<String>,
    QueryParams(scope): QueryParams<FlagScopeQuery>,
) -> ApiResult<StatusCode> {
    state
        .feature_flag_service
        .delete(&ctx, &key, scope.hospital_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/feature-flags/{key}/evaluate
pub async fn evaluate_flag(
    State(state): State<AppState>,
    ctx: OptionalHospitalContext,
    Path(key): Path<String>,
) -> ApiResult<Json<ApiResponse<FlagEvaluation>>> {
    let evaluation = state.feature_flag_service.evaluate(&ctx, &key).await?;
    Ok(Json(ApiResponse::ok(evaluation)))
}
