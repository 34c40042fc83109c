//! Argon2id hashing plus the strength rules new passwords must pass.

pub mod hasher;
pub mod validator;

pub use hasher::PasswordHasher;
pub use validator::PasswordValidator;
