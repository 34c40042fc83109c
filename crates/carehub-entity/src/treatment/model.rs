//! Treatment plan entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Status of a treatment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "treatment_plan_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatmentPlanStatus {
    /// Being written.
    Draft,
    /// In effect.
    Active,
    /// Finished.
    Completed,
}

impl fmt::Display for TreatmentPlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
        };
        f.write_str(s)
    }
}

/// A care plan for a patient over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TreatmentPlan {
    /// Unique plan identifier.
    pub id: Uuid,
    /// Owning hospital.
    pub hospital_id: Uuid,
    /// The patient.
    pub patient_id: Uuid,
    /// The doctor who wrote the plan.
    pub author_id: Uuid,
    /// Plan title.
    pub title: String,
    /// Plan details.
    pub description: Option<String>,
    /// Current status.
    pub status: TreatmentPlanStatus,
    /// First day of the plan.
    pub start_date: NaiveDate,
    /// Last day of the plan, if bounded.
    pub end_date: Option<NaiveDate>,
    /// When the plan was created.
    pub created_at: DateTime<Utc>,
    /// When the plan was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Entity for TreatmentPlan {
    const TABLE: &'static str = "treatment_plans";
    const COLUMNS: &'static [&'static str] =
        &["id", "hospital_id", "patient_id", "author_id", "status"];
    const ORDER_BY: SortField = SortField::desc("start_date");

    fn id(&self) -> Uuid {
        self.id
    }
}
