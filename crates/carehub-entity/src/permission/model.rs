//! Role permission entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Grants a named permission (e.g. `"lab.export"`) to every holder of an
/// authority.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RolePermission {
    /// Unique grant identifier.
    pub id: Uuid,
    /// Authority name the grant applies to.
    pub role: String,
    /// Permission name.
    pub permission: String,
    /// The administrator who created the grant.
    pub granted_by: Uuid,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
}

impl Entity for RolePermission {
    const TABLE: &'static str = "role_permissions";
    const COLUMNS: &'static [&'static str] = &["id", "role", "permission"];
    const ORDER_BY: SortField = SortField::asc("permission");

    fn id(&self) -> Uuid {
        self.id
    }
}
