//! Password-reset token entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single-use password-reset token. Only the SHA-256 digest is stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PasswordResetToken {
    /// Unique token identifier.
    pub id: Uuid,
    /// The account the token resets.
    pub staff_id: Uuid,
    /// Hex-encoded SHA-256 of the raw token.
    pub token_hash: String,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
    /// Set once the token has been used.
    pub consumed_at: Option<DateTime<Utc>>,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Whether the token can still be redeemed at `now`.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.consumed_at.is_none() && now < self.expires_at
    }
}

impl Entity for PasswordResetToken {
    const TABLE: &'static str = "password_reset_tokens";
    const COLUMNS: &'static [&'static str] = &["id", "staff_id", "token_hash", "consumed_at"];
    const ORDER_BY: SortField = SortField::desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}
