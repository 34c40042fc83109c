//! Lab order entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::LabOrderStatus;

/// A laboratory test ordered for a patient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LabOrder {
    /// Unique order identifier.
    pub id: Uuid,
    /// Owning hospital.
    pub hospital_id: Uuid,
    /// The patient.
    pub patient_id: Uuid,
    /// The ordering doctor.
    pub ordered_by: Uuid,
    /// Test code, e.g. a LOINC code.
    pub test_code: String,
    /// Human-readable test name.
    pub test_name: String,
    /// Current status.
    pub status: LabOrderStatus,
    /// Recorded result value.
    pub result_value: Option<String>,
    /// Unit of the result value.
    pub result_unit: Option<String>,
    /// Technician who recorded the result.
    pub resulted_by: Option<Uuid>,
    /// When the result was recorded.
    pub resulted_at: Option<DateTime<Utc>>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Entity for LabOrder {
    const TABLE: &'static str = "lab_orders";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "hospital_id",
        "patient_id",
        "ordered_by",
        "status",
        "test_code",
    ];
    const ORDER_BY: SortField = SortField::desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}
