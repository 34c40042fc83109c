//! Hospital entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A hospital. Every clinical record belongs to exactly one hospital.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hospital {
    /// Unique hospital identifier.
    pub id: Uuid,
    /// Short unique code, e.g. `"GEN-01"`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// City the hospital is located in.
    pub city: Option<String>,
    /// Switchboard phone number.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Inactive hospitals stay readable but accept no new records.
    pub active: bool,
    /// When the hospital was created.
    pub created_at: DateTime<Utc>,
    /// When the hospital was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Hospital {
    /// Build a new active hospital.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            name: name.into(),
            city: None,
            phone: None,
            email: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Hospital {
    const TABLE: &'static str = "hospitals";
    const COLUMNS: &'static [&'static str] = &["id", "code", "name", "city", "active"];
    const ORDER_BY: SortField = SortField::asc("name");

    fn id(&self) -> Uuid {
        self.id
    }
}
