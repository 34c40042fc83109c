//! Audit trail recording, search and export.

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::audit::AuditLogEntry;

use crate::context::{RequestContext, RequestMeta};
use crate::export::{self, ExportDocument, ExportFormat, Table};

/// Columns of the audit export.
const EXPORT_HEADERS: &[&str] = &[
    "created_at",
    "hospital_id",
    "actor_id",
    "action",
    "target_type",
    "target_id",
    "ip_address",
];

/// Something worth recording.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Dotted action name, e.g. `announcement.delete`.
    pub action: String,
    /// Kind of the affected record.
    pub target_type: String,
    /// ID of the affected record.
    pub target_id: Option<Uuid>,
    /// Free-form details.
    pub details: Option<Value>,
}

impl AuditEvent {
    /// Event about a record of `target_type`.
    pub fn new(action: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            target_type: target_type.into(),
            target_id: None,
            details: None,
        }
    }

    /// Set the affected record.
    pub fn target(mut self, id: Uuid) -> Self {
        self.target_id = Some(id);
        self
    }

    /// Attach details.
    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Filters accepted by the audit search.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// Exact action name.
    pub action: Option<String>,
    /// Exact actor.
    pub actor_id: Option<Uuid>,
    /// Exact target type.
    pub target_type: Option<String>,
}

/// Writes and reads the audit log.
#[derive(Debug, Clone)]
pub struct AuditService {
    audit_repo: Repo<AuditLogEntry>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(audit_repo: Repo<AuditLogEntry>) -> Self {
        Self { audit_repo }
    }

    /// Record an event performed by the caller.
    ///
    /// A failure to write the entry is logged and never surfaces.
    pub async fn record(&self, ctx: &RequestContext, event: AuditEvent) {
        self.write(ctx.hospital_id, Some(ctx.caller_id()), &ctx.meta, event)
            .await;
    }

    /// Record an event without an authenticated caller.
    pub async fn record_anonymous(
        &self,
        meta: &RequestMeta,
        actor_id: Option<Uuid>,
        event: AuditEvent,
    ) {
        self.write(None, actor_id, meta, event).await;
    }

    async fn write(
        &self,
        hospital_id: Option<Uuid>,
        actor_id: Option<Uuid>,
        meta: &RequestMeta,
        event: AuditEvent,
    ) {
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            hospital_id,
            actor_id,
            action: event.action,
            target_type: event.target_type,
            target_id: event.target_id,
            details: event.details,
            ip_address: Some(meta.client_ip.clone()),
            user_agent: meta.user_agent.clone(),
            created_at: Utc::now(),
        };
        match self.audit_repo.create(&entry).await {
            Ok(_) => info!(
                action = %entry.action,
                target_type = %entry.target_type,
                "Audit event recorded"
            ),
            Err(e) => error!(
                action = %entry.action,
                error = %e,
                "Failed to record audit event"
            ),
        }
    }

    /// Page through the audit log.
    ///
    /// Scoped to the resolved hospital; a super admin without a hospital
    /// context sees every hospital.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        query: &AuditQuery,
        page: &PageRequest,
    ) -> Result<PageResponse<AuditLogEntry>, AppError> {
        let filters = self.filters(ctx, query)?;
        self.audit_repo.find_all(&filters, page).await
    }

    /// Render the matching entries as a downloadable document.
    pub async fn export(
        &self,
        ctx: &RequestContext,
        query: &AuditQuery,
        format: ExportFormat,
    ) -> Result<ExportDocument, AppError> {
        let filters = self.filters(ctx, query)?;
        let entries = self.audit_repo.list_unbounded(&filters).await?;

        let opt = |v: Option<Uuid>| v.map(|id| id.to_string()).unwrap_or_default();
        let table = Table {
            title: "Audit log".to_string(),
            headers: EXPORT_HEADERS,
            rows: entries
                .iter()
                .map(|e| {
                    vec![
                        e.created_at.to_rfc3339(),
                        opt(e.hospital_id),
                        opt(e.actor_id),
                        e.action.clone(),
                        e.target_type.clone(),
                        opt(e.target_id),
                        e.ip_address.clone().unwrap_or_default(),
                    ]
                })
                .collect(),
        };

        info!(user_id = %ctx.caller_id(), rows = entries.len(), %format, "Audit log exported");
        export::render(format, "audit-log", &table)
    }

    fn filters(
        &self,
        ctx: &RequestContext,
        query: &AuditQuery,
    ) -> Result<Vec<FilterField>, AppError> {
        let mut filters = Vec::new();
        match ctx.hospital_id {
            Some(hospital_id) => filters.push(FilterField::eq("hospital_id", hospital_id)),
            None if ctx.identity.is_super_admin() => {}
            None => return Err(crate::context::missing_hospital_context()),
        }
        filters.extend(FilterField::eq_opt("action", query.action.as_deref()));
        filters.extend(FilterField::eq_opt("actor_id", query.actor_id));
        filters.extend(FilterField::eq_opt("target_type", query.target_type.as_deref()));
        Ok(filters)
    }
}
