//! Appointment handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use carehub_core::types::PageResponse;
use carehub_entity::appointment::Appointment;
use carehub_service::appointment::{AppointmentQuery, CreateAppointmentRequest};

use crate::dto::query::AppointmentListQuery;
use crate::dto::request::AppointmentStatusBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{HospitalContext, JsonBody, PaginationParams, QueryParams};
use crate::state::AppState;

/// GET /api/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    ctx: HospitalContext,
    QueryParams(filters): QueryParams<AppointmentListQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Appointment>>>> {
    let query = AppointmentQuery {
        status: filters.status,
        patient_id: filters.patient_id,
        practitioner_id: filters.practitioner_id,
    };
    let result = state
        .appointment_service
        .list(&ctx, &query, &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/appointments/{id}
pub async fn get_appointment(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Appointment>>> {
    let appointment = state.appointment_service.get(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(appointment)))
}

/// POST /api/appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    ctx: HospitalContext,
    JsonBody(req): JsonBody<CreateAppointmentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Appointment>>)> {
    let appointment = state.appointment_service.create(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(appointment))))
}

/// PUT /api/appointments/{id}/status
pub async fn change_status(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<AppointmentStatusBody>,
) -> ApiResult<Json<ApiResponse<Appointment>>> {
    let appointment = state
        .appointment_service
        .change_status(&ctx, id, body.status, body.notes)
        .await?;
    Ok(Json(ApiResponse::ok(appointment)))
}

/// DELETE /api/appointments/{id}
pub async fn delete_appointment(
    State(state): State<AppState>,
    ctx: HospitalContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.appointment_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
