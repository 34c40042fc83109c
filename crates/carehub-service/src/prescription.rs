//! Medication prescriptions.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::prescription::{Prescription, PrescriptionStatus};

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestContext;
use crate::scope::{find_scoped, hospital_filter};

/// Data for prescribing a medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub patient_id: Uuid,
    pub medication: String,
    pub dosage: String,
    pub frequency: String,
}

/// Issues and discontinues prescriptions.
#[derive(Debug, Clone)]
pub struct PrescriptionService {
    prescription_repo: Repo<Prescription>,
    audit: Arc<AuditService>,
}

impl PrescriptionService {
    /// Creates a new prescription service.
    pub fn new(prescription_repo: Repo<Prescription>, audit: Arc<AuditService>) -> Self {
        Self {
            prescription_repo,
            audit,
        }
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        patient_id: Option<Uuid>,
        status: Option<PrescriptionStatus>,
        page: &PageRequest,
    ) -> Result<PageResponse<Prescription>, AppError> {
        let mut filters = hospital_filter(ctx)?;
        filters.extend(FilterField::eq_opt("patient_id", patient_id));
        filters.extend(FilterField::eq_opt("status", status));
        self.prescription_repo.find_all(&filters, page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Prescription, AppError> {
        find_scoped(&self.prescription_repo, ctx, id).await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreatePrescriptionRequest,
    ) -> Result<Prescription, AppError> {
        let [medication, dosage, frequency] =
            [req.medication, req.dosage, req.frequency].map(|s| s.trim().to_string());
        if medication.is_empty() || dosage.is_empty() || frequency.is_empty() {
            return Err(AppError::validation(
                "Medication, dosage and frequency are required",
            ));
        }

        let now = Utc::now();
        let prescription = Prescription {
            id: Uuid::new_v4(),
            hospital_id: ctx.hospital()?,
            patient_id: req.patient_id,
            prescriber_id: ctx.caller_id(),
            medication,
            dosage,
            frequency,
            status: PrescriptionStatus::Active,
            discontinued_reason: None,
            created_at: now,
            updated_at: now,
        };
        let prescription = self.prescription_repo.create(&prescription).await?;

        self.audit
            .record(
                ctx,
                AuditEvent::new("prescription.create", "prescription").target(prescription.id),
            )
            .await;
        info!(
            prescription_id = %prescription.id,
            patient_id = %prescription.patient_id,
            "Prescription issued"
        );
        Ok(prescription)
    }

    /// Stop an active prescription.
    pub async fn discontinue(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<Prescription, AppError> {
        let mut prescription = find_scoped(&self.prescription_repo, ctx, id).await?;
        if prescription.status == PrescriptionStatus::Discontinued {
            return Err(AppError::conflict("Prescription is already discontinued"));
        }
        prescription.status = PrescriptionStatus::Discontinued;
        prescription.discontinued_reason = reason;
        prescription.updated_at = Utc::now();
        let prescription = self.prescription_repo.update(&prescription).await?;

        self.audit
            .record(ctx, AuditEvent::new("prescription.discontinue", "prescription").target(id))
            .await;
        info!(prescription_id = %id, "Prescription discontinued");
        Ok(prescription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_auth::Authority;
    use carehub_core::error::ErrorKind;
    use carehub_database::Repositories;

    use crate::testing::ctx;

    #[tokio::test]
    async fn test_discontinue_twice_conflicts() {
        let repos = Repositories::in_memory();
        let service = PrescriptionService::new(
            repos.prescriptions.clone(),
            Arc::new(AuditService::new(repos.audit_log.clone())),
        );
        let doctor = ctx(&[Authority::Doctor], Some(Uuid::new_v4()));
        let patient = Uuid::new_v4();
        let rx = service
            .create(
                &doctor,
                CreatePrescriptionRequest {
                    patient_id: patient,
                    medication: "Amoxicillin".into(),
                    dosage: "500 mg".into(),
                    frequency: "3x daily".into(),
                },
            )
            .await
            .unwrap();

        let stopped = service
            .discontinue(&doctor, rx.id, Some("Rash".into()))
            .await
            .unwrap();
        assert_eq!(stopped.status, PrescriptionStatus::Discontinued);

        let err = service.discontinue(&doctor, rx.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let active = service
            .list(&doctor, Some(patient), Some(PrescriptionStatus::Active), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(active.total_items, 0);
    }
}
