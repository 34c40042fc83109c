//! Payload carried by CareHub bearer tokens.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Token body. Unknown claims survive a decode in `extra`, which is how a
/// hospital pinned at login (`hospitalId`) reaches the context resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Staff account id.
    pub sub: Uuid,
    pub username: String,
    /// `Authority` names as of issuance; role changes apply on next login.
    #[serde(default)]
    pub authorities: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
    pub token_type: TokenType,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Refresh tokens are rejected wherever an access token is expected and
/// the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}
