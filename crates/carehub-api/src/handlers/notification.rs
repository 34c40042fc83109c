//! Notification handlers. Callers only ever see their own notifications.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use carehub_core::types::PageResponse;
use carehub_entity::notification::Notification;

use crate::dto::query::NotificationListQuery;
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthContext, PaginationParams, QueryParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    ctx: AuthContext,
    QueryParams(query): QueryParams<NotificationListQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Notification>>>> {
    let result = state
        .notification_service
        .list(&ctx, query.unread_only, &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.notification_service.unread_count(&ctx).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Notification>>> {
    let notification = state.notification_service.mark_read(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.notification_service.mark_all_read(&ctx).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.notification_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
