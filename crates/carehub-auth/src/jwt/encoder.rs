//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use carehub_core::config::AuthConfig;
use carehub_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Creates signed HS256 access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::minutes(config.jwt_access_ttl_minutes as i64),
            refresh_ttl: Duration::hours(config.jwt_refresh_ttl_hours as i64),
        }
    }

    /// Issues an access + refresh token pair.
    ///
    /// `extra` claims are copied into both tokens.
    pub fn issue_pair(
        &self,
        account_id: Uuid,
        username: &str,
        authorities: &[String],
        extra: Map<String, Value>,
    ) -> Result<TokenPair, AppError> {
        let access = self.claims(account_id, username, authorities, &extra, TokenType::Access);
        let refresh = self.claims(account_id, username, authorities, &extra, TokenType::Refresh);

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
            token_type: "Bearer".to_string(),
            access_expires_at: DateTime::from_timestamp(access.exp, 0).unwrap_or_else(Utc::now),
            refresh_expires_at: DateTime::from_timestamp(refresh.exp, 0).unwrap_or_else(Utc::now),
        })
    }

    /// Issues a standalone access token.
    pub fn issue_access_token(
        &self,
        account_id: Uuid,
        username: &str,
        authorities: &[String],
        extra: Map<String, Value>,
    ) -> Result<String, AppError> {
        let claims = self.claims(account_id, username, authorities, &extra, TokenType::Access);
        self.sign(&claims)
    }

    /// Signs an arbitrary claims set.
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    fn claims(
        &self,
        account_id: Uuid,
        username: &str,
        authorities: &[String],
        extra: &Map<String, Value>,
        token_type: TokenType,
    ) -> Claims {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        Claims {
            sub: account_id,
            username: username.to_string(),
            authorities: authorities.to_vec(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
            token_type,
            extra: extra.clone(),
        }
    }
}
