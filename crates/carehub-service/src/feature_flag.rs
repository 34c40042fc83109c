//! Feature flags with per-hospital overrides.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::feature_flag::FeatureFlag;

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestContext;

/// Data for setting a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFlagRequest {
    pub enabled: bool,
    pub description: Option<String>,
    /// Override for one hospital; absent sets the global value.
    pub hospital_id: Option<Uuid>,
}

/// Where an evaluated value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSource {
    Hospital,
    Global,
    Default,
}

/// Result of evaluating a flag for the caller's hospital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagEvaluation {
    pub key: String,
    pub enabled: bool,
    pub source: FlagSource,
}

#[derive(Debug, Clone)]
pub struct FeatureFlagService {
    flag_repo: Repo<FeatureFlag>,
    audit: Arc<AuditService>,
}

impl FeatureFlagService {
    /// Creates a new feature flag service.
    pub fn new(flag_repo: Repo<FeatureFlag>, audit: Arc<AuditService>) -> Self {
        Self { flag_repo, audit }
    }

    /// Every flag row, global and per hospital, ordered by key.
    pub async fn list(&self, page: &PageRequest) -> Result<PageResponse<FeatureFlag>, AppError> {
        self.flag_repo.find_all(&[], page).await
    }

    /// Create or replace the global value or one hospital's override.
    pub async fn set(
        &self,
        ctx: &RequestContext,
        key: &str,
        req: SetFlagRequest,
    ) -> Result<FeatureFlag, AppError> {
        let key = normalize_key(key)?;
        let flag = match self.find(&key, req.hospital_id).await? {
            Some(mut flag) => {
                flag.enabled = req.enabled;
                if req.description.is_some() {
                    flag.description = req.description;
                }
                flag.updated_by = Some(ctx.caller_id());
                flag.updated_at = Utc::now();
                self.flag_repo.update(&flag).await?
            }
            None => {
                let flag = FeatureFlag {
                    id: Uuid::new_v4(),
                    key: key.clone(),
                    description: req.description,
                    enabled: req.enabled,
                    hospital_id: req.hospital_id,
                    updated_by: Some(ctx.caller_id()),
                    updated_at: Utc::now(),
                };
                self.flag_repo.create(&flag).await?
            }
        };

        self.audit
            .record(
                ctx,
                AuditEvent::new("feature_flag.set", "feature_flag")
                    .target(flag.id)
                    .details(serde_json::json!({
                        "key": flag.key,
                        "enabled": flag.enabled,
                        "hospital_id": flag.hospital_id,
                    })),
            )
            .await;
        info!(
            key = %flag.key,
            enabled = flag.enabled,
            hospital_id = ?flag.hospital_id,
            "Feature flag set"
        );
        Ok(flag)
    }

    /// Remove the global value or one hospital's override.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        key: &str,
        hospital_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let key = normalize_key(key)?;
        let flag = self
            .find(&key, hospital_id)
            .await?
            .ok_or_else(|| AppError::not_found("Feature flag not found"))?;
        self.flag_repo.delete(flag.id).await?;

        self.audit
            .record(ctx, AuditEvent::new("feature_flag.delete", "feature_flag").target(flag.id))
            .await;
        Ok(())
    }

    /// Hospital override, then global value, then off.
    pub async fn evaluate(
        &self,
        ctx: &RequestContext,
        key: &str,
    ) -> Result<FlagEvaluation, AppError> {
        let key = normalize_key(key)?;
        if let Some(hospital_id) = ctx.hospital_id {
            if let Some(flag) = self.find(&key, Some(hospital_id)).await? {
                return Ok(FlagEvaluation {
                    key,
                    enabled: flag.enabled,
                    source: FlagSource::Hospital,
                });
            }
        }
        Ok(match self.find(&key, None).await? {
            Some(flag) => FlagEvaluation {
                key,
                enabled: flag.enabled,
                source: FlagSource::Global,
            },
            None => FlagEvaluation {
                key,
                enabled: false,
                source: FlagSource::Default,
            },
        })
    }

    async fn find(
        &self,
        key: &str,
        hospital_id: Option<Uuid>,
    ) -> Result<Option<FeatureFlag>, AppError> {
        let scope = match hospital_id {
            Some(id) => FilterField::eq("hospital_id", id),
            None => FilterField::is_null("hospital_id"),
        };
        self.flag_repo
            .find_one(&[FilterField::eq("key", key), scope])
            .await
    }
}

fn normalize_key(key: &str) -> Result<String, AppError> {
    let key = key.trim().to_lowercase();
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(AppError::validation(
            "Flag keys use letters, digits, '.', '_' and '-'",
        ));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_auth::Authority;
    use carehub_core::error::ErrorKind;
    use carehub_database::Repositories;

    use crate::testing::ctx;

    #[tokio::test]
    async fn test_hospital_override_beats_global() {
        let repos = Repositories::in_memory();
        let service = FeatureFlagService::new(
            repos.feature_flags.clone(),
            Arc::new(AuditService::new(repos.audit_log.clone())),
        );
        let hospital = Uuid::new_v4();
        let root = ctx(&[Authority::SuperAdmin], None);
        let reader = ctx(&[Authority::Nurse], Some(hospital));
        let elsewhere = ctx(&[Authority::Nurse], Some(Uuid::new_v4()));

        let eval = service.evaluate(&reader, "e-prescribing").await.unwrap();
        assert_eq!((eval.enabled, eval.source), (false, FlagSource::Default));

        let global = SetFlagRequest {
            enabled: true,
            description: Some("Electronic prescriptions".into()),
            hospital_id: None,
        };
        service.set(&root, "E-Prescribing", global.clone()).await.unwrap();
        service
            .set(
                &root,
                "e-prescribing",
                SetFlagRequest {
                    enabled: false,
                    description: None,
                    hospital_id: Some(hospital),
                },
            )
            .await
            .unwrap();
        // Setting again updates in place.
        service.set(&root, "e-prescribing", global).await.unwrap();

        let eval = service.evaluate(&reader, "e-prescribing").await.unwrap();
        assert_eq!((eval.enabled, eval.source), (false, FlagSource::Hospital));
        let eval = service.evaluate(&elsewhere, "e-prescribing").await.unwrap();
        assert_eq!((eval.enabled, eval.source), (true, FlagSource::Global));
        assert_eq!(service.list(&PageRequest::default()).await.unwrap().total_items, 2);

        service.delete(&root, "e-prescribing", Some(hospital)).await.unwrap();
        let eval = service.evaluate(&reader, "e-prescribing").await.unwrap();
        assert_eq!(eval.source, FlagSource::Global);
    }

    #[test]
    fn test_key_validation() {
        assert_eq!(normalize_key(" Beta.UI ").unwrap(), "beta.ui");
        assert_eq!(normalize_key("no spaces").unwrap_err().kind, ErrorKind::Validation);
    }
}
