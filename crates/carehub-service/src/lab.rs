//! Laboratory orders: ordering, resulting, cancelling and exporting.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::lab::{LabOrder, LabOrderStatus};

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestContext;
use crate::export::{self, ExportDocument, ExportFormat, Table};
use crate::notification::NotificationService;
use crate::scope::{find_scoped, hospital_filter};

const EXPORT_HEADERS: &[&str] = &[
    "id",
    "patient_id",
    "test_code",
    "test_name",
    "status",
    "result_value",
    "result_unit",
    "resulted_at",
    "created_at",
];

/// Data for ordering a test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLabOrderRequest {
    pub patient_id: Uuid,
    pub test_code: String,
    pub test_name: String,
}

/// A result reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabResultRequest {
    pub value: String,
    pub unit: Option<String>,
    /// `false` records a preliminary result.
    #[serde(default = "default_true")]
    pub final_result: bool,
}

fn default_true() -> bool {
    true
}

/// Lab order list filters.
#[derive(Debug, Clone, Default)]
pub struct LabOrderQuery {
    pub status: Option<LabOrderStatus>,
    pub patient_id: Option<Uuid>,
}

/// Manages lab orders of the caller's hospital.
#[derive(Debug, Clone)]
pub struct LabOrderService {
    lab_repo: Repo<LabOrder>,
    notifications: Arc<NotificationService>,
    audit: Arc<AuditService>,
}

impl LabOrderService {
    /// Creates a new lab order service.
    pub fn new(
        lab_repo: Repo<LabOrder>,
        notifications: Arc<NotificationService>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            lab_repo,
            notifications,
            audit,
        }
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: &LabOrderQuery,
        page: &PageRequest,
    ) -> Result<PageResponse<LabOrder>, AppError> {
        let filters = self.filters(ctx, query)?;
        self.lab_repo.find_all(&filters, page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<LabOrder, AppError> {
        find_scoped(&self.lab_repo, ctx, id).await
    }

    /// Place a `PENDING` order.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateLabOrderRequest,
    ) -> Result<LabOrder, AppError> {
        let test_code = req.test_code.trim().to_uppercase();
        if test_code.is_empty() || req.test_name.trim().is_empty() {
            return Err(AppError::validation("Test code and name are required"));
        }

        let now = Utc::now();
        let order = LabOrder {
            id: Uuid::new_v4(),
            hospital_id: ctx.hospital()?,
            patient_id: req.patient_id,
            ordered_by: ctx.caller_id(),
            test_code,
            test_name: req.test_name.trim().to_string(),
            status: LabOrderStatus::Pending,
            result_value: None,
            result_unit: None,
            resulted_by: None,
            resulted_at: None,
            created_at: now,
            updated_at: now,
        };
        let order = self.lab_repo.create(&order).await?;

        self.audit
            .record(ctx, AuditEvent::new("lab_order.create", "lab_order").target(order.id))
            .await;
        info!(lab_order_id = %order.id, test_code = %order.test_code, "Lab order placed");
        Ok(order)
    }

    /// Record a preliminary or final result. The ordering clinician is
    /// notified once the result is final.
    pub async fn record_result(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: LabResultRequest,
    ) -> Result<LabOrder, AppError> {
        if req.value.trim().is_empty() {
            return Err(AppError::validation("Result value cannot be empty"));
        }
        let mut order = find_scoped(&self.lab_repo, ctx, id).await?;
        if !order.status.accepts_result() {
            return Err(AppError::conflict(format!(
                "Cannot record a result on a {} lab order",
                order.status
            )));
        }

        let now = Utc::now();
        order.status = if req.final_result {
            LabOrderStatus::Final
        } else {
            LabOrderStatus::Preliminary
        };
        order.result_value = Some(req.value.trim().to_string());
        order.result_unit = req.unit.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        order.resulted_by = Some(ctx.caller_id());
        order.resulted_at = Some(now);
        order.updated_at = now;
        let order = self.lab_repo.update(&order).await?;

        if order.status == LabOrderStatus::Final {
            self.notifications
                .notify(
                    order.ordered_by,
                    Some(order.hospital_id),
                    "Lab result available",
                    format!("{} ({}) is final", order.test_name, order.test_code),
                )
                .await;
        }
        self.audit
            .record(
                ctx,
                AuditEvent::new("lab_order.result", "lab_order")
                    .target(id)
                    .details(serde_json::json!({ "status": order.status })),
            )
            .await;
        info!(lab_order_id = %id, status = %order.status, "Lab result recorded");
        Ok(order)
    }

    /// Cancel an order that has no final result.
    pub async fn cancel(&self, ctx: &RequestContext, id: Uuid) -> Result<LabOrder, AppError> {
        let mut order = find_scoped(&self.lab_repo, ctx, id).await?;
        if !order.status.is_cancellable() {
            return Err(AppError::conflict(format!(
                "A {} lab order cannot be cancelled",
                order.status
            )));
        }
        order.status = LabOrderStatus::Cancelled;
        order.updated_at = Utc::now();
        let order = self.lab_repo.update(&order).await?;

        self.audit
            .record(ctx, AuditEvent::new("lab_order.cancel", "lab_order").target(id))
            .await;
        info!(lab_order_id = %id, "Lab order cancelled");
        Ok(order)
    }

    /// Render the matching orders as a downloadable document.
    pub async fn export(
        &self,
        ctx: &RequestContext,
        query: &LabOrderQuery,
        format: ExportFormat,
    ) -> Result<ExportDocument, AppError> {
        let filters = self.filters(ctx, query)?;
        let orders = self.lab_repo.list_unbounded(&filters).await?;

        let table = Table {
            title: "Lab orders".to_string(),
            headers: EXPORT_HEADERS,
            rows: orders
                .iter()
                .map(|o| {
                    vec![
                        o.id.to_string(),
                        o.patient_id.to_string(),
                        o.test_code.clone(),
                        o.test_name.clone(),
                        o.status.to_string(),
                        o.result_value.clone().unwrap_or_default(),
                        o.result_unit.clone().unwrap_or_default(),
                        o.resulted_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
                        o.created_at.to_rfc3339(),
                    ]
                })
                .collect(),
        };

        self.audit
            .record(
                ctx,
                AuditEvent::new("lab_order.export", "lab_order")
                    .details(serde_json::json!({
                        "format": format.to_string(),
                        "rows": orders.len(),
                    })),
            )
            .await;
        export::render(format, "lab-orders", &table)
    }

    fn filters(
        &self,
        ctx: &RequestContext,
        query: &LabOrderQuery,
    ) -> Result<Vec<FilterField>, AppError> {
        let mut filters = hospital_filter(ctx)?;
        filters.extend(FilterField::eq_opt("status", query.status));
        filters.extend(FilterField::eq_opt("patient_id", query.patient_id));
        Ok(filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_auth::Authority;
    use carehub_core::error::ErrorKind;
    use carehub_database::Repositories;

    use crate::testing::ctx;

    fn service() -> (LabOrderService, Arc<NotificationService>) {
        let repos = Repositories::in_memory();
        let notifications = Arc::new(NotificationService::new(repos.notifications.clone()));
        let service = LabOrderService::new(
            repos.lab_orders.clone(),
            notifications.clone(),
            Arc::new(AuditService::new(repos.audit_log.clone())),
        );
        (service, notifications)
    }

    fn order() -> CreateLabOrderRequest {
        CreateLabOrderRequest {
            patient_id: Uuid::new_v4(),
            test_code: "glu".into(),
            test_name: "Glucose".into(),
        }
    }

    fn result(final_result: bool) -> LabResultRequest {
        LabResultRequest {
            value: "5.4".into(),
            unit: Some("mmol/L".into()),
            final_result,
        }
    }

    #[tokio::test]
    async fn test_final_result_notifies_and_blocks_cancel() {
        let (service, notifications) = service();
        let hospital = Some(Uuid::new_v4());
        let doctor = ctx(&[Authority::Doctor], hospital);
        let tech = ctx(&[Authority::LabTechnician], hospital);

        let placed = service.create(&doctor, order()).await.unwrap();
        assert_eq!(placed.test_code, "GLU");

        let prelim = service.record_result(&tech, placed.id, result(false)).await.unwrap();
        assert_eq!(prelim.status, LabOrderStatus::Preliminary);
        assert_eq!(notifications.unread_count(&doctor).await.unwrap(), 0);

        let fin = service.record_result(&tech, placed.id, result(true)).await.unwrap();
        assert_eq!(fin.status, LabOrderStatus::Final);
        assert_eq!(notifications.unread_count(&doctor).await.unwrap(), 1);

        let err = service.cancel(&doctor, placed.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        let err = service.record_result(&tech, placed.id, result(true)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_export_only_matching_status() {
        let (service, _) = service();
        let hospital = Some(Uuid::new_v4());
        let doctor = ctx(&[Authority::Doctor], hospital);
        let tech = ctx(&[Authority::LabTechnician], hospital);

        let done = service.create(&doctor, order()).await.unwrap();
        service.record_result(&tech, done.id, result(true)).await.unwrap();
        let open = service.create(&doctor, order()).await.unwrap();

        let query = LabOrderQuery {
            status: Some(LabOrderStatus::Final),
            patient_id: None,
        };
        let doc = service.export(&doctor, &query, ExportFormat::Csv).await.unwrap();
        let text = String::from_utf8(doc.bytes).unwrap();
        assert!(text.contains(&done.id.to_string()));
        assert!(!text.contains(&open.id.to_string()));
        assert_eq!(text.lines().count(), 2);
    }
}
