//! Staff accounts: login, token refresh, profile and provisioning.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use carehub_auth::{
    Authority, CallerIdentity, JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator,
    TokenPair,
};
use carehub_core::error::AppError;
use carehub_core::types::FilterField;
use carehub_database::Repo;
use carehub_entity::hospital::Hospital;
use carehub_entity::staff::{StaffAccount, StaffAssignment};

use crate::audit::{AuditEvent, AuditService};
use crate::context::{RequestContext, RequestMeta};

/// Claim carrying the caller's primary hospital.
pub const HOSPITAL_CLAIM: &str = "hospitalId";

/// One hospital the account works at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentView {
    /// Hospital ID.
    pub hospital_id: Uuid,
    /// Role held at that hospital.
    pub role: String,
    /// Whether this is the primary assignment.
    pub primary: bool,
}

/// What `GET /auth/me` returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub authorities: Vec<Authority>,
    pub assignments: Vec<AssignmentView>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Data for provisioning an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password: String,
    pub authorities: Vec<Authority>,
    /// Initial assignments; the first one flagged primary wins.
    #[serde(default)]
    pub assignments: Vec<AssignmentView>,
}

/// Authenticates staff and provisions accounts.
#[derive(Debug, Clone)]
pub struct AccountService {
    staff_repo: Repo<StaffAccount>,
    assignment_repo: Repo<StaffAssignment>,
    hospital_repo: Repo<Hospital>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    audit: Arc<AuditService>,
}

impl AccountService {
    /// Creates a new account service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        staff_repo: Repo<StaffAccount>,
        assignment_repo: Repo<StaffAssignment>,
        hospital_repo: Repo<Hospital>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            staff_repo,
            assignment_repo,
            hospital_repo,
            encoder,
            decoder,
            hasher,
            validator,
            audit,
        }
    }

    /// Exchange credentials for a token pair.
    ///
    /// Unknown usernames, wrong passwords and disabled accounts all produce
    /// the same error.
    pub async fn login(
        &self,
        meta: &RequestMeta,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, AppError> {
        let account = self
            .staff_repo
            .find_one(&[FilterField::eq("username", username.trim())])
            .await?;

        let verified = self
            .hasher
            .verify_or_burn(password, account.as_ref().map(|a| a.password_hash.as_str()))?;

        let mut account = match account {
            Some(account) if verified && account.active => account,
            other => {
                warn!(username = %username, ip = %meta.client_ip, "Login failed");
                self.audit
                    .record_anonymous(
                        meta,
                        other.map(|a| a.id),
                        AuditEvent::new("auth.login_failed", "staff_account"),
                    )
                    .await;
                return Err(AppError::authentication("Invalid username or password"));
            }
        };

        account.last_login_at = Some(Utc::now());
        let account = self.staff_repo.update(&account).await?;
        let pair = self.issue(&account).await?;

        self.audit
            .record_anonymous(
                meta,
                Some(account.id),
                AuditEvent::new("auth.login", "staff_account").target(account.id),
            )
            .await;
        info!(user_id = %account.id, username = %account.username, "Login succeeded");
        Ok(pair)
    }

    /// Exchange a refresh token for a new pair, re-reading the account so
    /// authority and assignment changes take effect.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;
        let account = self
            .staff_repo
            .find_by_id(claims.sub)
            .await?
            .filter(|a| a.active)
            .ok_or_else(|| AppError::authentication("Account is no longer active"))?;
        self.issue(&account).await
    }

    /// Profile of the authenticated caller.
    pub async fn profile(&self, identity: &CallerIdentity) -> Result<AccountProfile, AppError> {
        let account = self
            .staff_repo
            .find_by_id(identity.subject)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;
        let assignments = self.assignments(account.id).await?;

        Ok(AccountProfile {
            id: account.id,
            username: account.username,
            email: account.email,
            display_name: account.display_name,
            authorities: identity.authorities.iter().copied().collect(),
            assignments: assignments
                .into_iter()
                .map(|a| AssignmentView {
                    hospital_id: a.hospital_id,
                    role: a.role,
                    primary: a.primary_assignment,
                })
                .collect(),
            last_login_at: account.last_login_at,
        })
    }

    /// Hospitals the account is assigned to, primary first.
    pub async fn assigned_hospitals(&self, staff_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(self
            .assignments(staff_id)
            .await?
            .into_iter()
            .map(|a| a.hospital_id)
            .collect())
    }

    /// Provision an account on behalf of a super admin.
    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        req: CreateAccountRequest,
    ) -> Result<AccountProfile, AppError> {
        let account = self.provision(req).await?;
        self.audit
            .record(
                ctx,
                AuditEvent::new("account.create", "staff_account").target(account.id),
            )
            .await;
        let identity = CallerIdentity {
            subject: account.id,
            username: account.username.clone(),
            authorities: parse_authorities(&account.authorities),
            claims: Map::new(),
            assigned_hospitals: Vec::new(),
        };
        self.profile(&identity).await
    }

    /// Create the account unless the username is already taken.
    ///
    /// Used at startup to seed the first super admin.
    pub async fn ensure_account(&self, req: CreateAccountRequest) -> Result<bool, AppError> {
        let existing = self
            .staff_repo
            .find_one(&[FilterField::eq("username", req.username.trim())])
            .await?;
        if existing.is_some() {
            return Ok(false);
        }
        self.provision(req).await?;
        Ok(true)
    }

    async fn provision(&self, req: CreateAccountRequest) -> Result<StaffAccount, AppError> {
        let username = req.username.trim().to_string();
        let email = req.email.trim().to_lowercase();
        if username.is_empty() {
            return Err(AppError::validation("Username cannot be empty"));
        }
        if req.authorities.is_empty() {
            return Err(AppError::validation("At least one authority is required"));
        }
        self.validator.validate(&req.password, &[&username, &email])?;

        for field in [FilterField::eq("username", &username), FilterField::eq("email", &email)] {
            if self.staff_repo.count(std::slice::from_ref(&field)).await? > 0 {
                return Err(AppError::conflict(format!(
                    "An account with this {} already exists",
                    field.field
                )));
            }
        }
        for assignment in &req.assignments {
            if self.hospital_repo.find_by_id(assignment.hospital_id).await?.is_none() {
                return Err(AppError::validation(format!(
                    "Hospital {} does not exist",
                    assignment.hospital_id
                )));
            }
        }

        let now = Utc::now();
        let mut authorities = req.authorities;
        authorities.sort();
        authorities.dedup();
        let account = StaffAccount {
            id: Uuid::new_v4(),
            username,
            email,
            display_name: req.display_name,
            password_hash: self.hasher.hash_password(&req.password)?,
            authorities: authorities.iter().map(|a| a.as_str().to_string()).collect(),
            active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        let account = self.staff_repo.create(&account).await?;

        let mut primary_taken = false;
        for assignment in req.assignments {
            let primary = assignment.primary && !primary_taken;
            primary_taken |= primary;
            self.assignment_repo
                .create(&StaffAssignment {
                    id: Uuid::new_v4(),
                    staff_id: account.id,
                    hospital_id: assignment.hospital_id,
                    role: assignment.role,
                    primary_assignment: primary,
                    created_at: now,
                })
                .await?;
        }

        info!(user_id = %account.id, username = %account.username, "Account provisioned");
        Ok(account)
    }

    async fn assignments(&self, staff_id: Uuid) -> Result<Vec<StaffAssignment>, AppError> {
        let mut assignments = self
            .assignment_repo
            .list(&[FilterField::eq("staff_id", staff_id)])
            .await?;
        // Stable sort keeps creation order among non-primary assignments.
        assignments.sort_by_key(|a| !a.primary_assignment);
        Ok(assignments)
    }

    async fn issue(&self, account: &StaffAccount) -> Result<TokenPair, AppError> {
        let mut extra = Map::new();
        if let Some(primary) = self.assignments(account.id).await?.first() {
            extra.insert(
                HOSPITAL_CLAIM.to_string(),
                Value::String(primary.hospital_id.to_string()),
            );
        }
        self.encoder
            .issue_pair(account.id, &account.username, &account.authorities, extra)
    }
}

fn parse_authorities(names: &[String]) -> std::collections::BTreeSet<Authority> {
    names.iter().filter_map(|n| n.parse().ok()).collect()
}
