//! Permission grants per role.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use carehub_auth::{Authority, CallerIdentity};
use carehub_core::error::AppError;
use carehub_core::types::{FilterField, FilterOp, FilterValue, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::permission::RolePermission;

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestContext;

/// Data for granting a permission to a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantPermissionRequest {
    pub role: Authority,
    /// Dotted permission name, e.g. `lab_order.export`.
    pub permission: String,
}

/// The caller's roles and everything granted to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectivePermissions {
    pub authorities: Vec<Authority>,
    pub permissions: Vec<String>,
}

/// Manages role permission grants.
#[derive(Debug, Clone)]
pub struct PermissionService {
    permission_repo: Repo<RolePermission>,
    audit: Arc<AuditService>,
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(permission_repo: Repo<RolePermission>, audit: Arc<AuditService>) -> Self {
        Self {
            permission_repo,
            audit,
        }
    }

    pub async fn list(
        &self,
        role: Option<Authority>,
        page: &PageRequest,
    ) -> Result<PageResponse<RolePermission>, AppError> {
        let filters: Vec<FilterField> = FilterField::eq_opt("role", role).into_iter().collect();
        self.permission_repo.find_all(&filters, page).await
    }

    /// Grant `permission` to `role`. Granting twice is a conflict.
    pub async fn grant(
        &self,
        ctx: &RequestContext,
        req: GrantPermissionRequest,
    ) -> Result<RolePermission, AppError> {
        let permission = req.permission.trim().to_lowercase();
        if permission.is_empty()
            || !permission
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(AppError::validation(
                "Permission names use letters, digits, '.', '_' and '-'",
            ));
        }

        let existing = self
            .permission_repo
            .count(&[
                FilterField::eq("role", req.role),
                FilterField::eq("permission", &permission),
            ])
            .await?;
        if existing > 0 {
            return Err(AppError::conflict(format!(
                "{} already holds '{permission}'",
                req.role
            )));
        }

        let grant = RolePermission {
            id: Uuid::new_v4(),
            role: req.role.as_str().to_string(),
            permission,
            granted_by: ctx.caller_id(),
            created_at: Utc::now(),
        };
        let grant = self.permission_repo.create(&grant).await?;

        self.audit
            .record(
                ctx,
                AuditEvent::new("permission.grant", "role_permission")
                    .target(grant.id)
                    .details(serde_json::json!({
                        "role": grant.role,
                        "permission": grant.permission,
                    })),
            )
            .await;
        info!(role = %grant.role, permission = %grant.permission, "Permission granted");
        Ok(grant)
    }

    pub async fn revoke(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        if !self.permission_repo.delete(id).await? {
            return Err(AppError::not_found("Permission grant not found"));
        }
        self.audit
            .record(ctx, AuditEvent::new("permission.revoke", "role_permission").target(id))
            .await;
        info!(grant_id = %id, "Permission revoked");
        Ok(())
    }

    /// Union of the grants of every authority the caller holds.
    pub async fn effective_permissions(
        &self,
        identity: &CallerIdentity,
    ) -> Result<EffectivePermissions, AppError> {
        let roles: Vec<String> = identity
            .authorities
            .iter()
            .map(|a| a.as_str().to_string())
            .collect();

        let permissions: BTreeSet<String> = if roles.is_empty() {
            BTreeSet::new()
        } else {
            self.permission_repo
                .list(&[FilterField::new(
                    "role",
                    FilterOp::In,
                    FilterValue::StringList(roles),
                )])
                .await?
                .into_iter()
                .map(|g| g.permission)
                .collect()
        };

        Ok(EffectivePermissions {
            authorities: identity.authorities.iter().copied().collect(),
            permissions: permissions.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_core::error::ErrorKind;
    use carehub_database::Repositories;

    use crate::testing::ctx;

    #[tokio::test]
    async fn test_grant_revoke_and_effective() {
        let repos = Repositories::in_memory();
        let service = PermissionService::new(
            repos.role_permissions.clone(),
            Arc::new(AuditService::new(repos.audit_log.clone())),
        );
        let root = ctx(&[Authority::SuperAdmin], None);
        let grant = |role, permission: &str| GrantPermissionRequest {
            role,
            permission: permission.into(),
        };

        let export = service
            .grant(&root, grant(Authority::Doctor, "Lab_Order.Export"))
            .await
            .unwrap();
        assert_eq!(export.permission, "lab_order.export");
        service.grant(&root, grant(Authority::Nurse, "ward.view")).await.unwrap();
        service.grant(&root, grant(Authority::Pharmacist, "stock.view")).await.unwrap();

        let dup = service
            .grant(&root, grant(Authority::Doctor, "lab_order.export"))
            .await
            .unwrap_err();
        assert_eq!(dup.kind, ErrorKind::Conflict);

        let caller = CallerIdentity::for_testing(&[Authority::Doctor, Authority::Nurse]);
        let effective = service.effective_permissions(&caller).await.unwrap();
        assert_eq!(effective.permissions, vec!["lab_order.export", "ward.view"]);

        service.revoke(&root, export.id).await.unwrap();
        assert!(service.revoke(&root, export.id).await.unwrap_err().is_not_found());
    }
}
