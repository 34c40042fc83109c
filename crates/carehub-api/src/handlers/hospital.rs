//! Hospital directory handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::PageResponse;
use carehub_entity::hospital::Hospital;
use carehub_service::hospital::{HospitalQuery, ImportSummary};

use crate::dto::query::HospitalListQuery;
use crate::dto::request::{CreateHospitalBody, UpdateHospitalBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthContext, PaginationParams, QueryParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/hospitals
pub async fn list_hospitals(
    State(state): State<AppState>,
    QueryParams(filters): QueryParams<HospitalListQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Hospital>>>> {
    let query = HospitalQuery {
        name: filters.name,
        city: filters.city,
        active: filters.active,
    };
    let result = state
        .hospital_service
        .list(&query, &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/hospitals/{id}
pub async fn get_hospital(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Hospital>>> {
    let hospital = state.hospital_service.get(id).await?;
    Ok(Json(ApiResponse::ok(hospital)))
}

/// POST /api/hospitals
pub async fn create_hospital(
    State(state): State<AppState>,
    ctx: AuthContext,
    ValidatedJson(body): ValidatedJson<CreateHospitalBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Hospital>>)> {
    let hospital = state.hospital_service.create(&ctx, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(hospital))))
}

/// PUT /api/hospitals/{id}
pub async fn update_hospital(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateHospitalBody>,
) -> ApiResult<Json<ApiResponse<Hospital>>> {
    let hospital = state
        .hospital_service
        .update(&ctx, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(hospital)))
}

/// DELETE /api/hospitals/{id}
pub async fn delete_hospital(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.hospital_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/hospitals/import
///
/// Expects a multipart form with a CSV part named `file`.
pub async fn import_hospitals(
    State(state): State<AppState>,
    ctx: AuthContext,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<ImportSummary>>> {
    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
            data = Some(bytes);
            break;
        }
    }

    let data = data.ok_or_else(|| AppError::validation("Missing 'file' part"))?;
    let summary = state.hospital_service.import_csv(&ctx, &data).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
