//! Hospital (tenant) context configuration.

use serde::{Deserialize, Serialize};

/// Controls how the resolved hospital context is checked against the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    /// Reject a resolved hospital the caller holds no staff assignment for.
    ///
    /// Callers without any assignment (token-claim tenants) and
    /// `SUPER_ADMIN` callers are never rejected by this check.
    #[serde(default = "default_true")]
    pub enforce_membership: bool,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            enforce_membership: true,
        }
    }
}

fn default_true() -> bool {
    true
}
