//! Discharge approval handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use carehub_core::types::PageResponse;
use carehub_entity::discharge::{DischargeApproval, DischargeStatus};
use carehub_service::discharge::{DischargeDecision, DischargeRequest};

use crate::dto::query::DischargeListQuery;
use crate::dto::request::DecisionBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{HospitalContext, JsonBody, PaginationParams, QueryParams, ValidatedJson};
use crate::state::AppState;

/// POST /api/discharge-approvals
pub async fn request_discharge(
    State(state): State<AppState>,
    ctx: HospitalContext,
    JsonBody(req): JsonBody<DischargeRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<DischargeApproval>>)> {
    let approval = state.discharge_service.request(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(approval))))
}

/// GET /api/discharge-approvals
///
/// Lists pending requests unless another status is asked for.
pub async fn list_discharges(
    State(state): State<AppState>,
    ctx: HospitalContext,
    QueryParams(filters): QueryParams<DischargeListQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<DischargeApproval>>>> {
    let status = filters.status.unwrap_or(DischargeStatus::Pending);
    let result = state
        .discharge_service
        .list(&ctx, Some(status), filters.patient_id, &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/discharge-approvals/{id}
pub async fn get_discharge(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<DischargeApproval>>> {
    let approval = state.discharge_service.get(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(approval)))
}

/// POST /api/discharge-approvals/{id}/approve
pub async fn approve_discharge(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<DecisionBody>,
) -> ApiResult<Json<ApiResponse<DischargeApproval>>> {
    decide(&state, &ctx, id, DischargeDecision::Approve, body).await
}

/// POST /api/discharge-approvals/{id}/reject
pub async fn reject_discharge(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<DecisionBody>,
) -> ApiResult<Json<ApiResponse<DischargeApproval>>> {
    decide(&state, &ctx, id, DischargeDecision::Reject, body).await
}

async fn decide(
    state: &AppState,
    ctx: &HospitalContext,
    id: Uuid,
    decision: DischargeDecision,
    body: DecisionBody,
) -> ApiResult<Json<ApiResponse<DischargeApproval>>> {
    let approval = state
        .discharge_service
        .decide(ctx, id, decision, body.note)
        .await?;
    Ok(Json(ApiResponse::ok(approval)))
}
