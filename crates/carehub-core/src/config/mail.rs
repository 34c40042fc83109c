//! Outgoing mail configuration.

use serde::{Deserialize, Serialize};

/// Sender identity and links embedded in outgoing mail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// `From` address on every message.
    #[serde(default = "default_from")]
    pub from_address: String,
    /// Base URL of the page that completes a password reset; the token is
    /// appended as a `token` query parameter.
    #[serde(default = "default_reset_url")]
    pub password_reset_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_address: default_from(),
            password_reset_url: default_reset_url(),
        }
    }
}

fn default_from() -> String {
    "no-reply@carehub.local".to_string()
}

fn default_reset_url() -> String {
    "https://carehub.local/reset-password".to_string()
}
