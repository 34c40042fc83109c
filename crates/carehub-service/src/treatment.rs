//! Treatment plans.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::treatment::{TreatmentPlan, TreatmentPlanStatus};

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestContext;
use crate::scope::{find_scoped, hospital_filter};

/// Full content of a treatment plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentPlanRequest {
    pub patient_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TreatmentPlanStatus>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct TreatmentPlanService {
    plan_repo: Repo<TreatmentPlan>,
    audit: Arc<AuditService>,
}

impl TreatmentPlanService {
    /// Creates a new treatment plan service.
    pub fn new(plan_repo: Repo<TreatmentPlan>, audit: Arc<AuditService>) -> Self {
        Self { plan_repo, audit }
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        patient_id: Option<Uuid>,
        status: Option<TreatmentPlanStatus>,
        page: &PageRequest,
    ) -> Result<PageResponse<TreatmentPlan>, AppError> {
        let mut filters = hospital_filter(ctx)?;
        filters.extend(FilterField::eq_opt("patient_id", patient_id));
        filters.extend(FilterField::eq_opt("status", status));
        self.plan_repo.find_all(&filters, page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<TreatmentPlan, AppError> {
        find_scoped(&self.plan_repo, ctx, id).await
    }

    /// New plans start as `DRAFT` unless a status is given.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: TreatmentPlanRequest,
    ) -> Result<TreatmentPlan, AppError> {
        validate(&req)?;
        let now = Utc::now();
        let plan = TreatmentPlan {
            id: Uuid::new_v4(),
            hospital_id: ctx.hospital()?,
            patient_id: req.patient_id,
            author_id: ctx.caller_id(),
            title: req.title.trim().to_string(),
            description: req.description,
            status: req.status.unwrap_or(TreatmentPlanStatus::Draft),
            start_date: req.start_date,
            end_date: req.end_date,
            created_at: now,
            updated_at: now,
        };
        let plan = self.plan_repo.create(&plan).await?;

        self.audit
            .record(
                ctx,
                AuditEvent::new("treatment_plan.create", "treatment_plan").target(plan.id),
            )
            .await;
        info!(plan_id = %plan.id, patient_id = %plan.patient_id, "Treatment plan created");
        Ok(plan)
    }

    /// Replace the plan content. The patient cannot change.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: TreatmentPlanRequest,
    ) -> Result<TreatmentPlan, AppError> {
        validate(&req)?;
        let mut plan = find_scoped(&self.plan_repo, ctx, id).await?;
        if plan.patient_id != req.patient_id {
            return Err(AppError::validation("A treatment plan cannot move to another patient"));
        }

        plan.title = req.title.trim().to_string();
        plan.description = req.description;
        if let Some(status) = req.status {
            plan.status = status;
        }
        plan.start_date = req.start_date;
        plan.end_date = req.end_date;
        plan.updated_at = Utc::now();
        let plan = self.plan_repo.update(&plan).await?;

        self.audit
            .record(ctx, AuditEvent::new("treatment_plan.update", "treatment_plan").target(id))
            .await;
        Ok(plan)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        find_scoped(&self.plan_repo, ctx, id).await?;
        self.plan_repo.delete(id).await?;
        self.audit
            .record(ctx, AuditEvent::new("treatment_plan.delete", "treatment_plan").target(id))
            .await;
        Ok(())
    }
}

fn validate(req: &TreatmentPlanRequest) -> Result<(), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::validation("Title cannot be empty"));
    }
    if req.end_date.is_some_and(|end| end < req.start_date) {
        return Err(AppError::validation("End date cannot precede start date"));
    }
    Ok(())
}
