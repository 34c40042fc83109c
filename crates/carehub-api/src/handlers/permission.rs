//! Role permission handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use carehub_auth::Authority;
use carehub_core::types::PageResponse;
use carehub_entity::permission::RolePermission;
use carehub_service::permission::{EffectivePermissions, GrantPermissionRequest};

use crate::dto::query::RoleQuery;
use crate::dto::request::GrantPermissionBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthContext, PaginationParams, QueryParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<RoleQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<RolePermission>>>> {
    let role = query.role.as_deref().map(str::parse::<Authority>).transpose()?;
    let result = state
        .permission_service
        .list(role, &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/permissions
pub async fn grant_permission(
    State(state): State<AppState>,
    ctx: AuthContext,
    ValidatedJson(body): ValidatedJson<GrantPermissionBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<RolePermission>>)> {
    let req = GrantPermissionRequest {
        role: body.role,
        permission: body.permission,
    };
    let granted = state.permission_service.grant(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(granted))))
}

/// DELETE /api/permissions/{id}
pub async fn revoke_permission(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.permission_service.revoke(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/permissions/me
pub async fn my_permissions(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> ApiResult<Json<ApiResponse<EffectivePermissions>>> {
    let effective = state
        .permission_service
        .effective_permissions(&ctx.identity)
        .await?;
    Ok(Json(ApiResponse::ok(effective)))
}
