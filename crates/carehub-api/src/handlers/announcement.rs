//! Announcement board handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use carehub_core::types::PageResponse;
use carehub_entity::announcement::Announcement;

use crate::dto::query::SearchQuery;
use crate::dto::request::AnnouncementBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{HospitalContext, PaginationParams, QueryParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/announcements
pub async fn list_announcements(
    State(state): State<AppState>,
    ctx: HospitalContext,
    QueryParams(query): QueryParams<SearchQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Announcement>>>> {
    let result = state
        .announcement_service
        .list(&ctx, query.search.as_deref(), &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/announcements/{id}
pub async fn get_announcement(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Announcement>>> {
    let announcement = state.announcement_service.get(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(announcement)))
}

/// POST /api/announcements
pub async fn create_announcement(
    State(state): State<AppState>,
    ctx: HospitalContext,
    ValidatedJson(body): ValidatedJson<AnnouncementBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Announcement>>)> {
    let announcement = state
        .announcement_service
        .create(&ctx, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(announcement))))
}

/// PUT /api/announcements/{id}
///
/// Only the author or a super admin may edit.
pub async fn update_announcement(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<AnnouncementBody>,
) -> ApiResult<Json<ApiResponse<Announcement>>> {
    let announcement = state
        .announcement_service
        .update(&ctx, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(announcement)))
}

/// DELETE /api/announcements/{id}
pub async fn delete_announcement(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.announcement_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
