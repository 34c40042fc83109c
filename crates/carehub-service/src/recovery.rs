//! Password reset and username reminders.
//!
//! Callers outside the service cannot tell whether an address belongs to
//! an account: the HTTP layer turns every not-found here into the same
//! empty response.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use carehub_auth::{PasswordHasher, PasswordValidator, token};
use carehub_core::config::{AuthConfig, MailConfig};
use carehub_core::error::AppError;
use carehub_core::types::FilterField;
use carehub_database::Repo;
use carehub_entity::staff::{PasswordResetToken, StaffAccount};

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestMeta;
use crate::mail::{MailMessage, Mailer};

/// Issues and redeems password-reset tokens.
#[derive(Debug, Clone)]
pub struct RecoveryService {
    staff_repo: Repo<StaffAccount>,
    token_repo: Repo<PasswordResetToken>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    mailer: Arc<dyn Mailer>,
    audit: Arc<AuditService>,
    reset_url: String,
    token_ttl: Duration,
}

impl RecoveryService {
    /// Creates a new recovery service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        staff_repo: Repo<StaffAccount>,
        token_repo: Repo<PasswordResetToken>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        mailer: Arc<dyn Mailer>,
        audit: Arc<AuditService>,
        auth: &AuthConfig,
        mail: &MailConfig,
    ) -> Self {
        Self {
            staff_repo,
            token_repo,
            hasher,
            validator,
            mailer,
            audit,
            reset_url: mail.password_reset_url.clone(),
            token_ttl: Duration::minutes(auth.reset_token_ttl_minutes as i64),
        }
    }

    /// Mail a reset link to the account registered under `email`.
    ///
    /// Earlier unused tokens of the account stop working.
    pub async fn request_password_reset(
        &self,
        meta: &RequestMeta,
        email: &str,
    ) -> Result<(), AppError> {
        let account = self.active_account_by_email(email).await?;

        let outstanding = self
            .token_repo
            .list(&[
                FilterField::eq("staff_id", account.id),
                FilterField::is_null("consumed_at"),
            ])
            .await?;
        for mut stale in outstanding {
            stale.consumed_at = Some(meta.request_time);
            self.token_repo.update(&stale).await?;
        }

        let issued = token::generate();
        self.token_repo
            .create(&PasswordResetToken {
                id: Uuid::new_v4(),
                staff_id: account.id,
                token_hash: issued.digest,
                expires_at: meta.request_time + self.token_ttl,
                consumed_at: None,
                created_at: meta.request_time,
            })
            .await?;

        self.deliver(
            account.id,
            MailMessage {
                to: account.email.clone(),
                subject: "Reset your CareHub password".to_string(),
                body: format!(
                    "A password reset was requested for {}.\n\n\
                     Follow this link within {} minutes to choose a new password:\n\
                     {}?token={}\n\n\
                     If you did not ask for this, ignore this message.",
                    account.username,
                    self.token_ttl.num_minutes(),
                    self.reset_url,
                    issued.raw
                ),
            },
        )
        .await;

        self.audit
            .record_anonymous(
                meta,
                Some(account.id),
                AuditEvent::new("auth.password_reset_requested", "staff_account")
                    .target(account.id),
            )
            .await;
        info!(user_id = %account.id, "Password reset token issued");
        Ok(())
    }

    /// Redeem a reset token and set a new password.
    pub async fn confirm_password_reset(
        &self,
        meta: &RequestMeta,
        raw_token: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let mut reset = self
            .token_repo
            .find_one(&[FilterField::eq("token_hash", token::digest(raw_token))])
            .await?
            .filter(|t| t.is_usable(meta.request_time))
            .ok_or_else(|| AppError::not_found("Reset token not found or expired"))?;

        let mut account = self
            .staff_repo
            .find_by_id(reset.staff_id)
            .await?
            .filter(|a| a.active)
            .ok_or_else(|| AppError::not_found("Account not found"))?;

        self.validator
            .validate(new_password, &[&account.username, &account.email])?;

        account.password_hash = self.hasher.hash_password(new_password)?;
        account.updated_at = meta.request_time;
        self.staff_repo.update(&account).await?;

        reset.consumed_at = Some(meta.request_time);
        self.token_repo.update(&reset).await?;

        self.audit
            .record_anonymous(
                meta,
                Some(account.id),
                AuditEvent::new("auth.password_reset", "staff_account").target(account.id),
            )
            .await;
        info!(user_id = %account.id, "Password reset completed");
        Ok(())
    }

    /// Mail the username registered under `email`.
    pub async fn remind_username(&self, meta: &RequestMeta, email: &str) -> Result<(), AppError> {
        let account = self.active_account_by_email(email).await?;
        self.deliver(
            account.id,
            MailMessage {
                to: account.email.clone(),
                subject: "Your CareHub username".to_string(),
                body: format!("Your CareHub username is: {}", account.username),
            },
        )
        .await;
        info!(user_id = %account.id, ip = %meta.client_ip, "Username reminder sent");
        Ok(())
    }

    /// Delivery failures are logged and swallowed: a registered address
    /// must get the same answer as an unknown one.
    async fn deliver(&self, account_id: Uuid, message: MailMessage) {
        if let Err(err) = self.mailer.send(&message).await {
            warn!(user_id = %account_id, error = %err, "Recovery mail was not delivered");
        }
    }

    async fn active_account_by_email(&self, email: &str) -> Result<StaffAccount, AppError> {
        self.staff_repo
            .find_one(&[FilterField::eq("email", email.trim().to_lowercase())])
            .await?
            .filter(|a| a.active)
            .ok_or_else(|| AppError::not_found("No active account for this address"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_auth::Authority;
    use carehub_core::error::ErrorKind;
    use carehub_database::Repositories;

    use crate::account::tests::{PASSWORD, request, service as account_service};
    use crate::testing::{FailingMailer, RecordingMailer, meta};

    fn service(repos: &Repositories, mailer: Arc<dyn Mailer>) -> RecoveryService {
        RecoveryService::new(
            repos.staff.clone(),
            repos.reset_tokens.clone(),
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordValidator::new(&AuthConfig::default())),
            mailer,
            Arc::new(AuditService::new(repos.audit_log.clone())),
            &AuthConfig::default(),
            &MailConfig::default(),
        )
    }

    fn token_from(body: &str) -> String {
        body.split("token=")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_reset_round_trip_is_single_use() {
        let repos = Repositories::in_memory();
        let accounts = account_service(&repos);
        accounts
            .ensure_account(request("pharm", &[Authority::Pharmacist]))
            .await
            .unwrap();
        let mailer = Arc::new(RecordingMailer::default());
        let recovery = service(&repos, mailer.clone());

        recovery
            .request_password_reset(&meta(), "PHARM@carehub.test")
            .await
            .unwrap();
        let raw = token_from(&mailer.messages()[0].body);

        let new_password = "Quartz-Meadow-Lantern-88";
        recovery
            .confirm_password_reset(&meta(), &raw, new_password)
            .await
            .unwrap();
        accounts.login(&meta(), "pharm", new_password).await.unwrap();
        assert!(accounts.login(&meta(), "pharm", PASSWORD).await.is_err());

        let reused = recovery
            .confirm_password_reset(&meta(), &raw, "Another-Strong-Phrase-41")
            .await
            .unwrap_err();
        assert!(reused.is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found_and_sends_nothing() {
        let repos = Repositories::in_memory();
        let mailer = Arc::new(RecordingMailer::default());
        let recovery = service(&repos, mailer.clone());

        let err = recovery
            .request_password_reset(&meta(), "ghost@carehub.test")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        let err = recovery
            .remind_username(&meta(), "ghost@carehub.test")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(mailer.messages().is_empty());
    }

    #[tokio::test]
    async fn test_weak_password_is_rejected_and_token_survives() {
        let repos = Repositories::in_memory();
        account_service(&repos)
            .ensure_account(request("lab.tech", &[Authority::LabTechnician]))
            .await
            .unwrap();
        let mailer = Arc::new(RecordingMailer::default());
        let recovery = service(&repos, mailer.clone());
        recovery
            .request_password_reset(&meta(), "lab.tech@carehub.test")
            .await
            .unwrap();
        let raw = token_from(&mailer.messages()[0].body);

        let err = recovery
            .confirm_password_reset(&meta(), &raw, "short")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        recovery
            .confirm_password_reset(&meta(), &raw, "Copper-Falcon-Orchard-17")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mail_outage_does_not_reveal_the_account() {
        let repos = Repositories::in_memory();
        account_service(&repos)
            .ensure_account(request("billing", &[Authority::BillingSpecialist]))
            .await
            .unwrap();
        let recovery = service(&repos, Arc::new(FailingMailer));

        recovery
            .request_password_reset(&meta(), "billing@carehub.test")
            .await
            .unwrap();
        recovery
            .remind_username(&meta(), "billing@carehub.test")
            .await
            .unwrap();
        // The token was still issued; only delivery failed.
        let tokens = repos.reset_tokens.count(&[]).await.unwrap();
        assert_eq!(tokens, 1);
    }
}
