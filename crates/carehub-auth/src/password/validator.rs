//! Password policy enforcement for new passwords.

use carehub_core::config::AuthConfig;
use carehub_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    entropy_check: bool,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            entropy_check: config.password_entropy_check,
        }
    }

    /// Validates a password. `user_inputs` (username, email, …) count
    /// against the entropy estimate.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if password.trim().is_empty() {
            return Err(AppError::validation("Password must not be blank"));
        }

        if self.entropy_check {
            let estimate = zxcvbn::zxcvbn(password, user_inputs);
            if estimate.score() < zxcvbn::Score::Three {
                return Err(AppError::validation(
                    "Password is too weak. Please use a stronger password with more entropy.",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_core::error::ErrorKind;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_rejects_short_and_weak() {
        let err = validator().validate("short", &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(validator().validate("password123", &[]).is_err());
    }

    #[test]
    fn test_rejects_password_built_from_username() {
        assert!(
            validator()
                .validate("margaret.hamilton1", &["margaret.hamilton"])
                .is_err()
        );
    }

    #[test]
    fn test_accepts_strong_passphrase() {
        assert!(
            validator()
                .validate("violet-tundra-Quartz-harbor-58", &[])
                .is_ok()
        );
    }
}
