//! Treatment plan handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use carehub_core::types::PageResponse;
use carehub_entity::treatment::TreatmentPlan;
use carehub_service::treatment::TreatmentPlanRequest;

use crate::dto::query::TreatmentPlanListQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{HospitalContext, JsonBody, PaginationParams, QueryParams};
use crate::state::AppState;

/// GET /api/treatment-plans
pub async fn list_treatment_plans(
    State(state): State<AppState>,
    ctx: HospitalContext,
    QueryParams(filters): QueryParams<TreatmentPlanListQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<TreatmentPlan>>>> {
    let result = state
        .treatment_plan_service
        .list(&ctx, filters.patient_id, filters.status, &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/treatment-plans/{id}
pub async fn get_treatment_plan(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<TreatmentPlan>>> {
    let plan = state.treatment_plan_service.get(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(plan)))
}

/// POST /api/treatment-plans
pub async fn create_treatment_plan(
    State(state): State<AppState>,
    ctx: HospitalContext,
    JsonBody(req): JsonBody<TreatmentPlanRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TreatmentPlan>>)> {
    let plan = state.treatment_plan_service.create(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(plan))))
}

/// PUT /api/treatment-plans/{id}
pub async fn update_treatment_plan(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
    JsonBody(req): JsonBody<TreatmentPlanRequest>,
) -> ApiResult<Json<ApiResponse<TreatmentPlan>>> {
    let plan = state.treatment_plan_service.update(&ctx, id, req).await?;
    Ok(Json(ApiResponse::ok(plan)))
}

/// DELETE /api/treatment-plans/{id}
pub async fn delete_treatment_plan(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.treatment_plan_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
