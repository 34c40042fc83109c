//! Discharge approval entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Decision state of a discharge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "discharge_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DischargeStatus {
    /// Awaiting a decision.
    Pending,
    /// Discharge approved.
    Approved,
    /// Discharge rejected.
    Rejected,
}

impl fmt::Display for DischargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// A request to discharge an admitted patient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DischargeApproval {
    /// Unique request identifier.
    pub id: Uuid,
    /// Owning hospital.
    pub hospital_id: Uuid,
    /// The patient to discharge.
    pub patient_id: Uuid,
    /// Clinician who raised the request.
    pub requested_by: Uuid,
    /// Clinician who decided on it.
    pub decided_by: Option<Uuid>,
    /// Current status.
    pub status: DischargeStatus,
    /// Clinical justification.
    pub reason: Option<String>,
    /// Note attached to the decision.
    pub decision_note: Option<String>,
    /// When the decision was made.
    pub decided_at: Option<DateTime<Utc>>,
    /// When the request was raised.
    pub created_at: DateTime<Utc>,
}

impl Entity for DischargeApproval {
    const TABLE: &'static str = "discharge_approvals";
    const COLUMNS: &'static [&'static str] =
        &["id", "hospital_id", "patient_id", "requested_by", "status"];
    const ORDER_BY: SortField = SortField::desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}
