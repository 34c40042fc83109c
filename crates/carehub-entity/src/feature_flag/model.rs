//! Feature flag entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A feature toggle. A row with `hospital_id` set overrides the global row
/// (`hospital_id` null) with the same key for that hospital.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeatureFlag {
    /// Unique flag identifier.
    pub id: Uuid,
    /// Flag key, e.g. `"lab.auto_release"`.
    pub key: String,
    /// What the flag controls.
    pub description: Option<String>,
    /// Whether the feature is on.
    pub enabled: bool,
    /// Hospital the override applies to; `None` for the global default.
    pub hospital_id: Option<Uuid>,
    /// The administrator who last changed it.
    pub updated_by: Option<Uuid>,
    /// When the flag was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Entity for FeatureFlag {
    const TABLE: &'static str = "feature_flags";
    const COLUMNS: &'static [&'static str] = &["id", "key", "hospital_id", "enabled"];
    const ORDER_BY: SortField = SortField::asc("key");

    fn id(&self) -> Uuid {
        self.id
    }
}
