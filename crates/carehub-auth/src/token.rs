//! Single-use recovery tokens.
//!
//! The raw token only ever leaves the process inside a mail; storage keeps
//! the hex SHA-256 digest.

use sha2::{Digest, Sha256};

/// Raw token bytes before hex encoding.
const TOKEN_BYTES: usize = 32;

/// A freshly generated token and the digest to persist.
#[derive(Debug, Clone)]
pub struct RecoveryToken {
    /// Hex-encoded random token sent to the account owner.
    pub raw: String,
    /// Hex-encoded SHA-256 of `raw`.
    pub digest: String,
}

/// Generate a new random token.
pub fn generate() -> RecoveryToken {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    let raw = hex::encode(bytes);
    let digest = digest(&raw);
    RecoveryToken { raw, digest }
}

/// Digest of a raw token, as stored.
pub fn digest(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.trim().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_and_digest_matches() {
        let a = generate();
        let b = generate();
        assert_ne!(a.raw, b.raw);
        assert_eq!(a.raw.len(), TOKEN_BYTES * 2);
        assert_eq!(digest(&a.raw), a.digest);
        assert_ne!(a.raw, a.digest);
    }
}
