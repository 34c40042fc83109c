//! Prescription entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Status of a prescription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "prescription_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrescriptionStatus {
    /// In effect.
    Active,
    /// Stopped by the prescriber.
    Discontinued,
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Discontinued => write!(f, "DISCONTINUED"),
        }
    }
}

/// A medication order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prescription {
    /// Unique prescription identifier.
    pub id: Uuid,
    /// Owning hospital.
    pub hospital_id: Uuid,
    /// The patient.
    pub patient_id: Uuid,
    /// The prescribing doctor.
    pub prescriber_id: Uuid,
    /// Medication name.
    pub medication: String,
    /// Dose per administration, e.g. `"500 mg"`.
    pub dosage: String,
    /// Administration frequency, e.g. `"every 8 hours"`.
    pub frequency: String,
    /// Current status.
    pub status: PrescriptionStatus,
    /// Why the prescription was discontinued.
    pub discontinued_reason: Option<String>,
    /// When the prescription was written.
    pub created_at: DateTime<Utc>,
    /// When the prescription was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Entity for Prescription {
    const TABLE: &'static str = "prescriptions";
    const COLUMNS: &'static [&'static str] =
        &["id", "hospital_id", "patient_id", "prescriber_id", "status"];
    const ORDER_BY: SortField = SortField::desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}
