//! Audit log entry entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable audit log entry recording a caller action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// Hospital the action happened in, if any.
    pub hospital_id: Option<Uuid>,
    /// The account that performed the action; absent for anonymous flows.
    pub actor_id: Option<Uuid>,
    /// The action that was performed (e.g., `"lab_order.result"`).
    pub action: String,
    /// The type of target resource (e.g., `"lab_order"`).
    pub target_type: String,
    /// The target resource ID (if applicable).
    pub target_id: Option<Uuid>,
    /// Additional details about the action (JSON).
    pub details: Option<serde_json::Value>,
    /// IP address of the actor.
    pub ip_address: Option<String>,
    /// User-Agent of the actor.
    pub user_agent: Option<String>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

impl Entity for AuditLogEntry {
    const TABLE: &'static str = "audit_log";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "hospital_id",
        "actor_id",
        "action",
        "target_type",
        "target_id",
    ];
    const ORDER_BY: SortField = SortField::desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}
