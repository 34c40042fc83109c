//! Prescription handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use carehub_core::types::PageResponse;
use carehub_entity::prescription::Prescription;
use carehub_service::prescription::CreatePrescriptionRequest;

use crate::dto::query::PrescriptionListQuery;
use crate::dto::request::ReasonBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{HospitalContext, JsonBody, PaginationParams, QueryParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/prescriptions
pub async fn list_prescriptions(
    State(state): State<AppState>,
    ctx: HospitalContext,
    QueryParams(filters): QueryParams<PrescriptionListQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Prescription>>>> {
    let result = state
        .prescription_service
        .list(&ctx, filters.patient_id, filters.status, &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/prescriptions/{id}
pub async fn get_prescription(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Prescription>>> {
    let prescription = state.prescription_service.get(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(prescription)))
}

/// POST /api/prescriptions
pub async fn create_prescription(
    State(state): State<AppState>,
    ctx: HospitalContext,
    JsonBody(req): JsonBody<CreatePrescriptionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Prescription>>)> {
    let prescription = state.prescription_service.create(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(prescription))))
}

/// POST /api/prescriptions/{id}/discontinue
pub async fn discontinue_prescription(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<ReasonBody>,
) -> ApiResult<Json<ApiResponse<Prescription>>> {
    let prescription = state
        .prescription_service
        .discontinue(&ctx, id, body.reason)
        .await?;
    Ok(Json(ApiResponse::ok(prescription)))
}
