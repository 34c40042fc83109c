//! Appointment entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::AppointmentStatus;

/// A scheduled patient visit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    /// Unique appointment identifier.
    pub id: Uuid,
    /// Owning hospital.
    pub hospital_id: Uuid,
    /// The patient.
    pub patient_id: Uuid,
    /// The practitioner seeing the patient, if assigned.
    pub practitioner_id: Option<Uuid>,
    /// Start of the visit.
    pub scheduled_at: DateTime<Utc>,
    /// Reason for the visit.
    pub reason: Option<String>,
    /// Current status.
    pub status: AppointmentStatus,
    /// Free-text notes recorded on status changes.
    pub notes: Option<String>,
    /// The account that booked it.
    pub created_by: Uuid,
    /// When the appointment was booked.
    pub created_at: DateTime<Utc>,
    /// When the appointment was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Entity for Appointment {
    const TABLE: &'static str = "appointments";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "hospital_id",
        "patient_id",
        "practitioner_id",
        "status",
        "scheduled_at",
    ];
    const ORDER_BY: SortField = SortField::asc("scheduled_at");

    fn id(&self) -> Uuid {
        self.id
    }
}
