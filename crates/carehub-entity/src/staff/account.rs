//! Staff account entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A login-capable account. Patients with portal access are accounts too.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffAccount {
    /// Unique account identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Email address used for recovery mail.
    pub email: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Argon2 password hash. Never leaves the service layer.
    pub password_hash: String,
    /// Granted authority names, e.g. `["DOCTOR"]`.
    pub authorities: Vec<String>,
    /// Disabled accounts cannot log in.
    pub active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Entity for StaffAccount {
    const TABLE: &'static str = "staff_accounts";
    const COLUMNS: &'static [&'static str] = &["id", "username", "email", "active"];
    const ORDER_BY: SortField = SortField::asc("username");

    fn id(&self) -> Uuid {
        self.id
    }
}
