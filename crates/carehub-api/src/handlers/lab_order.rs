//! Lab order handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use uuid::Uuid;

use carehub_core::types::PageResponse;
use carehub_entity::lab::{LabOrder, LabOrderStatus};
use carehub_service::lab::{CreateLabOrderRequest, LabOrderQuery, LabResultRequest};

use crate::dto::query::{ExportQuery, LabOrderListQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{HospitalContext, JsonBody, PaginationParams, QueryParams};
use crate::handlers::attachment;
use crate::state::AppState;

/// Status shown when the caller does not filter.
const DEFAULT_LIST_STATUS: LabOrderStatus = LabOrderStatus::Final;

/// GET /api/lab-orders
pub async fn list_lab_orders(
    State(state): State<AppState>,
    ctx: HospitalContext,
    QueryParams(filters): QueryParams<LabOrderListQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<LabOrder>>>> {
    let query = LabOrderQuery {
        status: Some(filters.status.unwrap_or(DEFAULT_LIST_STATUS)),
        patient_id: filters.patient_id,
    };
    let result = state
        .lab_order_service
        .list(&ctx, &query, &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/lab-orders/{id}
pub async fn get_lab_order(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<LabOrder>>> {
    let order = state.lab_order_service.get(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// POST /api/lab-orders
pub async fn create_lab_order(
    State(state): State<AppState>,
    ctx: HospitalContext,
    JsonBody(req): JsonBody<CreateLabOrderRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<LabOrder>>)> {
    let order = state.lab_order_service.create(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

/// PUT /api/lab-orders/{id}/result
pub async fn record_result(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
    JsonBody(req): JsonBody<LabResultRequest>,
) -> ApiResult<Json<ApiResponse<LabOrder>>> {
    let order = state.lab_order_service.record_result(&ctx, id, req).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// POST /api/lab-orders/{id}/cancel
pub async fn cancel_lab_order(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<LabOrder>>> {
    let order = state.lab_order_service.cancel(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// GET /api/lab-orders/export?format=csv|pdf
pub async fn export_lab_orders(
    State(state): State<AppState>,
    ctx: HospitalContext,
    QueryParams(export): QueryParams<ExportQuery>,
    QueryParams(filters): QueryParams<LabOrderListQuery>,
) -> ApiResult<Response> {
    let format = export.format()?;
    let query = LabOrderQuery {
        status: filters.status,
        patient_id: filters.patient_id,
    };
    let document = state.lab_order_service.export(&ctx, &query, format).await?;
    Ok(attachment(document))
}
