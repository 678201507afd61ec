//! Password policy enforcement for new passwords.

use scribe_core::config::auth::AuthConfig;
use scribe_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
    /// Minimum zxcvbn strength score (0-4).
    min_score: u8,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_score: config.password_min_score.min(4),
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        let estimate = zxcvbn::zxcvbn(password, &[]);
        if (estimate.score() as u8) < self.min_score {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password with more entropy.",
            ));
        }

        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator {
            min_length: 8,
            min_score: 3,
        }
    }

    #[test]
    fn accepts_strong_password() {
        assert!(validator().validate("tr0ub4dor&3-Xk").is_ok());
    }

    #[test]
    fn rejects_short_password() {
        let err = validator().validate("Ab1!").unwrap_err();
        assert!(err.message.contains("at least 8"));
    }

    #[test]
    fn rejects_missing_character_classes() {
        assert!(validator().validate("alllowercase1").is_err());
        assert!(validator().validate("ALLUPPERCASE1").is_err());
        assert!(validator().validate("NoDigitsHere!").is_err());
    }

    #[test]
    fn rejects_weak_but_compliant_password() {
        // Has every character class but scores poorly.
        assert!(validator().validate("Password1").is_err());
    }

    #[test]
    fn rejects_unchanged_password() {
        assert!(validator().validate_not_same("same", "same").is_err());
        assert!(validator().validate_not_same("old", "new").is_ok());
    }
}
