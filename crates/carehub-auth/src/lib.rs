//! # carehub-auth
//!
//! Authentication and authorization primitives for CareHub.
//!
//! ## Modules
//!
//! - `jwt`: access/refresh token creation and validation
//! - `password`: Argon2id password hashing and policy enforcement
//! - `token`: single-use recovery tokens stored as SHA-256 digests
//! - `rbac`: authorities, declarative access policies and the route policy table
//! - `identity`: the authenticated caller as seen by the rest of the request

pub mod identity;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod token;

pub use identity::CallerIdentity;
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{AccessPolicy, Authority};
