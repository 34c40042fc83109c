//! The authenticated caller.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use carehub_core::error::AppError;

use crate::jwt::Claims;
use crate::rbac::Authority;

/// Who is calling, as established by the authentication layer.
///
/// Built once per request and only read afterwards.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    /// Account ID.
    pub subject: Uuid,
    /// Login name.
    pub username: String,
    /// Recognised authorities.
    pub authorities: BTreeSet<Authority>,
    /// Every token claim besides the registered ones.
    pub claims: Map<String, Value>,
    /// Hospitals from the caller's staff assignments, primary first.
    pub assigned_hospitals: Vec<Uuid>,
}

impl CallerIdentity {
    /// Build an identity from validated claims and the caller's assignments.
    ///
    /// Authority names that are not recognised are skipped.
    pub fn from_claims(claims: Claims, assigned_hospitals: Vec<Uuid>) -> Self {
        let authorities = claims
            .authorities
            .iter()
            .filter_map(|name| match name.parse::<Authority>() {
                Ok(a) => Some(a),
                Err(_) => {
                    debug!(authority = %name, subject = %claims.sub, "Ignoring unknown authority");
                    None
                }
            })
            .collect();

        Self {
            subject: claims.sub,
            username: claims.username,
            authorities,
            claims: claims.extra,
            assigned_hospitals,
        }
    }

    /// Whether the caller holds `authority`.
    pub fn has_authority(&self, authority: Authority) -> bool {
        self.authorities.contains(&authority)
    }

    /// Whether the caller is a platform administrator.
    pub fn is_super_admin(&self) -> bool {
        self.has_authority(Authority::SuperAdmin)
    }

    /// A claim by name.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Owner predicate: pass when the caller created the resource or is a
    /// super admin.
    pub fn require_owner(&self, owner_id: Uuid) -> Result<(), AppError> {
        if self.subject == owner_id || self.is_super_admin() {
            Ok(())
        } else {
            Err(AppError::authorization("Access is denied"))
        }
    }

    /// Identity with the given authorities and nothing else.
    pub fn for_testing(authorities: &[Authority]) -> Self {
        Self {
            subject: Uuid::new_v4(),
            username: "test".to_string(),
            authorities: authorities.iter().copied().collect(),
            claims: Map::new(),
            assigned_hospitals: Vec::new(),
        }
    }
}
