//! Invoice handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::ValidateEmail;

use carehub_core::error::AppError;
use carehub_core::types::PageResponse;
use carehub_entity::invoice::Invoice;
use carehub_service::invoice::{CreateInvoiceRequest, InvoiceQuery};

use crate::dto::query::{EmailQuery, InvoiceListQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{HospitalContext, JsonBody, PaginationParams, QueryParams};
use crate::state::AppState;

/// GET /api/invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    ctx: HospitalContext,
    QueryParams(filters): QueryParams<InvoiceListQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Invoice>>>> {
    let query = InvoiceQuery {
        status: filters.status,
        patient_id: filters.patient_id,
    };
    let result = state
        .invoice_service
        .list(&ctx, &query, &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Invoice>>> {
    let invoice = state.invoice_service.get(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(invoice)))
}

/// POST /api/invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    ctx: HospitalContext,
    JsonBody(req): JsonBody<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Invoice>>)> {
    let invoice = state.invoice_service.create(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(invoice))))
}

/// POST /api/invoices/{id}/send-to?email=
///
/// The address is checked before the mailer is involved.
pub async fn send_invoice(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
    QueryParams(query): QueryParams<EmailQuery>,
) -> ApiResult<Json<ApiResponse<Invoice>>> {
    let email = query
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| e.validate_email())
        .ok_or_else(|| AppError::validation("A valid 'email' query parameter is required"))?;

    let invoice = state.invoice_service.send_to(&ctx, id, &email).await?;
    Ok(Json(ApiResponse::ok(invoice)))
}
