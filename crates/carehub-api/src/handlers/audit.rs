//! Audit trail handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use carehub_core::types::PageResponse;
use carehub_entity::audit::AuditLogEntry;
use carehub_service::audit::{AuditEvent, AuditQuery};

use crate::context::resolve_client_ip;
use crate::dto::query::{AuditListQuery, ExportQuery};
use crate::dto::request::AuditEventBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{OptionalHospitalContext, PaginationParams, QueryParams, ValidatedJson};
use crate::handlers::attachment;
use crate::state::AppState;

fn audit_query(filters: AuditListQuery) -> AuditQuery {
    AuditQuery {
        action: filters.action,
        actor_id: filters.actor_id,
        target_type: filters.target_type,
    }
}

/// GET /api/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    ctx: OptionalHospitalContext,
    QueryParams(filters): QueryParams<AuditListQuery>,
    QueryParams(page): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<AuditLogEntry>>>> {
    let result = state
        .audit_service
        .search(&ctx, &audit_query(filters), &page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/audit-logs/events
///
/// Recording happens after the response is sent.
pub async fn record_event(
    State(state): State<AppState>,
    ctx: OptionalHospitalContext,
    ValidatedJson(body): ValidatedJson<AuditEventBody>,
) -> ApiResult<StatusCode> {
    let mut ctx = ctx.0;
    ctx.meta.client_ip =
        resolve_client_ip(body.client_ip.as_deref(), None, None, &ctx.meta.client_ip);

    let mut event = AuditEvent::new(body.action, body.target_type);
    if let Some(id) = body.target_id {
        event = event.target(id);
    }
    if let Some(details) = body.details {
        event = event.details(details);
    }

    let audit = state.audit_service.clone();
    tokio::spawn(async move {
        audit.record(&ctx, event).await;
    });
    Ok(StatusCode::ACCEPTED)
}

/// GET /api/audit-logs/export?format=csv|pdf
pub async fn export_audit_logs(
    State(state): State<AppState>,
    ctx: OptionalHospitalContext,
    QueryParams(export): QueryParams<ExportQuery>,
    QueryParams(filters): QueryParams<AuditListQuery>,
) -> ApiResult<Response> {
    let format = export.format()?;
    let document = state
        .audit_service
        .export(&ctx, &audit_query(filters), format)
        .await?;
    Ok(attachment(document))
}
