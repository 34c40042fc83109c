//! Staff inbox rows.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Inbox entry for one staff account, raised by lab results, discharge
/// decisions and similar workflow events.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    /// Hospital whose workflow produced it; `None` for account-level notices.
    pub hospital_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    /// Set once by mark-read; never cleared.
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}

impl Entity for Notification {
    const TABLE: &'static str = "notifications";
    const COLUMNS: &'static [&'static str] = &["id", "recipient_id", "hospital_id", "read_at"];
    const ORDER_BY: SortField = SortField::desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}
