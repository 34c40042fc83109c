//! Appointment scheduling and lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::appointment::{Appointment, AppointmentStatus};

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestContext;
use crate::scope::{find_scoped, hospital_filter};

/// Data for booking an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    /// Required for staff; a caller acting as patient books for themself.
    pub patient_id: Option<Uuid>,
    pub practitioner_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// Appointment list filters.
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
    pub status: Option<AppointmentStatus>,
    pub patient_id: Option<Uuid>,
    pub practitioner_id: Option<Uuid>,
}

/// Books appointments and moves them through their lifecycle.
#[derive(Debug, Clone)]
pub struct AppointmentService {
    appointment_repo: Repo<Appointment>,
    audit: Arc<AuditService>,
}

impl AppointmentService {
    /// Creates a new appointment service.
    pub fn new(appointment_repo: Repo<Appointment>, audit: Arc<AuditService>) -> Self {
        Self {
            appointment_repo,
            audit,
        }
    }

    /// Appointments of the hospital in schedule order.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: &AppointmentQuery,
        page: &PageRequest,
    ) -> Result<PageResponse<Appointment>, AppError> {
        let mut filters = hospital_filter(ctx)?;
        filters.extend(FilterField::eq_opt("status", query.status));
        filters.extend(FilterField::eq_opt("practitioner_id", query.practitioner_id));
        if ctx.is_acting_as_patient() {
            filters.push(FilterField::eq("patient_id", ctx.caller_id()));
        } else {
            filters.extend(FilterField::eq_opt("patient_id", query.patient_id));
        }
        self.appointment_repo.find_all(&filters, page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Appointment, AppError> {
        let appointment = find_scoped(&self.appointment_repo, ctx, id).await?;
        if ctx.is_acting_as_patient() && appointment.patient_id != ctx.caller_id() {
            return Err(AppError::not_found("Appointment not found"));
        }
        Ok(appointment)
    }

    /// Book an appointment in the `SCHEDULED` state.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        let hospital_id = ctx.hospital()?;
        let patient_id = if ctx.is_acting_as_patient() {
            match req.patient_id {
                Some(other) if other != ctx.caller_id() => {
                    return Err(AppError::authorization(
                        "Patients can only book appointments for themselves",
                    ));
                }
                _ => ctx.caller_id(),
            }
        } else {
            req.patient_id
                .ok_or_else(|| AppError::validation("patient_id is required"))?
        };
        if req.scheduled_at <= ctx.meta.request_time {
            return Err(AppError::validation("Appointments must be scheduled in the future"));
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            hospital_id,
            patient_id,
            practitioner_id: req.practitioner_id,
            scheduled_at: req.scheduled_at,
            reason: req.reason,
            status: AppointmentStatus::Scheduled,
            notes: req.notes,
            created_by: ctx.caller_id(),
            created_at: now,
            updated_at: now,
        };
        let appointment = self.appointment_repo.create(&appointment).await?;

        self.audit
            .record(
                ctx,
                AuditEvent::new("appointment.create", "appointment").target(appointment.id),
            )
            .await;
        info!(
            appointment_id = %appointment.id,
            patient_id = %patient_id,
            scheduled_at = %appointment.scheduled_at,
            "Appointment booked"
        );
        Ok(appointment)
    }

    /// Move an appointment to `status`. Transitions the lifecycle does not
    /// allow are conflicts.
    pub async fn change_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: AppointmentStatus,
        notes: Option<String>,
    ) -> Result<Appointment, AppError> {
        let mut appointment = find_scoped(&self.appointment_repo, ctx, id).await?;
        if !appointment.status.can_transition_to(status) {
            return Err(AppError::conflict(format!(
                "Appointment cannot move from {} to {}",
                appointment.status, status
            )));
        }

        let previous = appointment.status;
        appointment.status = status;
        if notes.is_some() {
            appointment.notes = notes;
        }
        appointment.updated_at = Utc::now();
        let appointment = self.appointment_repo.update(&appointment).await?;

        self.audit
            .record(
                ctx,
                AuditEvent::new("appointment.status", "appointment")
                    .target(id)
                    .details(serde_json::json!({ "from": previous, "to": status })),
            )
            .await;
        info!(appointment_id = %id, from = %previous, to = %status, "Appointment status changed");
        Ok(appointment)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        find_scoped(&self.appointment_repo, ctx, id).await?;
        self.appointment_repo.delete(id).await?;
        self.audit
            .record(ctx, AuditEvent::new("appointment.delete", "appointment").target(id))
            .await;
        Ok(())
    }
}
