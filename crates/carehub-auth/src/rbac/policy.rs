//! Declarative per-route access policy.

use tracing::warn;

use carehub_core::error::AppError;

use super::authority::Authority;
use crate::identity::CallerIdentity;

/// A static disjunction of authorities attached to a route.
///
/// The caller passes when it holds at least one listed authority. An empty
/// list admits every authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Name used in logs.
    pub name: &'static str,
    /// Accepted authorities.
    pub any_of: &'static [Authority],
}

impl AccessPolicy {
    /// Build a policy admitting any of `authorities`.
    pub const fn any_of(name: &'static str, authorities: &'static [Authority]) -> Self {
        Self {
            name,
            any_of: authorities,
        }
    }

    /// Build a policy admitting every authenticated caller.
    pub const fn authenticated(name: &'static str) -> Self {
        Self { name, any_of: &[] }
    }

    /// Whether the caller satisfies the policy.
    pub fn permits(&self, caller: &CallerIdentity) -> bool {
        self.any_of.is_empty() || self.any_of.iter().any(|a| caller.has_authority(*a))
    }

    /// Return an authorization error when the caller does not satisfy the
    /// policy. The message names no resource.
    pub fn evaluate(&self, caller: &CallerIdentity) -> Result<(), AppError> {
        if self.permits(caller) {
            return Ok(());
        }
        warn!(
            policy = self.name,
            subject = %caller.subject,
            username = %caller.username,
            "Access denied"
        );
        Err(AppError::authorization("Access is denied"))
    }
}
