//! Staff-to-hospital assignment.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Links an account to a hospital it works at.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffAssignment {
    /// Unique assignment identifier.
    pub id: Uuid,
    /// The assigned account.
    pub staff_id: Uuid,
    /// The hospital.
    pub hospital_id: Uuid,
    /// Authority exercised at this hospital.
    pub role: String,
    /// The primary assignment is the fallback hospital context.
    pub primary_assignment: bool,
    /// When the assignment was created.
    pub created_at: DateTime<Utc>,
}

impl Entity for StaffAssignment {
    const TABLE: &'static str = "staff_assignments";
    const COLUMNS: &'static [&'static str] =
        &["id", "staff_id", "hospital_id", "role", "primary_assignment"];
    const ORDER_BY: SortField = SortField::asc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}
