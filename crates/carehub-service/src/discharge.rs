//! Discharge approval workflow.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::discharge::{DischargeApproval, DischargeStatus};

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestContext;
use crate::notification::NotificationService;
use crate::scope::{find_scoped, hospital_filter};

/// Data for requesting a discharge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DischargeRequest {
    pub patient_id: Uuid,
    pub reason: Option<String>,
}

/// Approve or reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DischargeDecision {
    Approve,
    Reject,
}

impl DischargeDecision {
    fn status(self) -> DischargeStatus {
        match self {
            Self::Approve => DischargeStatus::Approved,
            Self::Reject => DischargeStatus::Rejected,
        }
    }
}

/// Routes discharge requests to a second clinician or administrator.
#[derive(Debug, Clone)]
pub struct DischargeService {
    discharge_repo: Repo<DischargeApproval>,
    notifications: Arc<NotificationService>,
    audit: Arc<AuditService>,
}

impl DischargeService {
    /// Creates a new discharge service.
    pub fn new(
        discharge_repo: Repo<DischargeApproval>,
        notifications: Arc<NotificationService>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            discharge_repo,
            notifications,
            audit,
        }
    }

    /// Open a `PENDING` approval. One open request per patient.
    pub async fn request(
        &self,
        ctx: &RequestContext,
        req: DischargeRequest,
    ) -> Result<DischargeApproval, AppError> {
        let hospital_id = ctx.hospital()?;
        let open = self
            .discharge_repo
            .count(&[
                FilterField::eq("hospital_id", hospital_id),
                FilterField::eq("patient_id", req.patient_id),
                FilterField::eq("status", DischargeStatus::Pending),
            ])
            .await?;
        if open > 0 {
            return Err(AppError::conflict(
                "A discharge request is already pending for this patient",
            ));
        }

        let approval = DischargeApproval {
            id: Uuid::new_v4(),
            hospital_id,
            patient_id: req.patient_id,
            requested_by: ctx.caller_id(),
            decided_by: None,
            status: DischargeStatus::Pending,
            reason: req.reason,
            decision_note: None,
            decided_at: None,
            created_at: Utc::now(),
        };
        let approval = self.discharge_repo.create(&approval).await?;

        self.audit
            .record(
                ctx,
                AuditEvent::new("discharge.request", "discharge_approval").target(approval.id),
            )
            .await;
        info!(approval_id = %approval.id, patient_id = %approval.patient_id, "Discharge requested");
        Ok(approval)
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        status: Option<DischargeStatus>,
        patient_id: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<PageResponse<DischargeApproval>, AppError> {
        let mut filters = hospital_filter(ctx)?;
        filters.extend(FilterField::eq_opt("status", status));
        filters.extend(FilterField::eq_opt("patient_id", patient_id));
        self.discharge_repo.find_all(&filters, page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<DischargeApproval, AppError> {
        find_scoped(&self.discharge_repo, ctx, id).await
    }

    /// Decide a pending request. Requesters cannot approve their own
    /// request; they may still withdraw it by rejecting.
    pub async fn decide(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        decision: DischargeDecision,
        note: Option<String>,
    ) -> Result<DischargeApproval, AppError> {
        let mut approval = find_scoped(&self.discharge_repo, ctx, id).await?;
        if approval.status != DischargeStatus::Pending {
            return Err(AppError::conflict(format!(
                "Discharge request is already {}",
                approval.status
            )));
        }
        if decision == DischargeDecision::Approve && approval.requested_by == ctx.caller_id() {
            warn!(approval_id = %id, user_id = %ctx.caller_id(), "Self-approval refused");
            return Err(AppError::authorization(
                "A discharge must be approved by someone other than the requester",
            ));
        }

        approval.status = decision.status();
        approval.decided_by = Some(ctx.caller_id());
        approval.decision_note = note;
        approval.decided_at = Some(Utc::now());
        let approval = self.discharge_repo.update(&approval).await?;

        self.notifications
            .notify(
                approval.requested_by,
                Some(approval.hospital_id),
                "Discharge request decided",
                format!(
                    "The discharge request for patient {} was {}",
                    approval.patient_id,
                    approval.status.to_string().to_lowercase()
                ),
            )
            .await;
        self.audit
            .record(
                ctx,
                AuditEvent::new("discharge.decide", "discharge_approval")
                    .target(id)
                    .details(serde_json::json!({ "status": approval.status })),
            )
            .await;
        info!(approval_id = %id, status = %approval.status, "Discharge decided");
        Ok(approval)
    }
}
