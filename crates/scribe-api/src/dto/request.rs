//! Request DTOs with input validation.

use serde::Deserialize;
use validator::Validate;

use scribe_core::error::AppError;

/// Runs `validator` checks, folding failures into a validation error.
pub fn validate<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate().map_err(|e| {
        let detail = e
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string())
                    })
                    .collect();
                format!("{field}: {}", messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::validation(detail)
    })
}

/// Body for POST /api/auth/register.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 5, max = 32, message = "must be 5-32 characters"))]
    pub phone_number: String,
    #[validate(length(max = 512, message = "is too long"))]
    pub password: String,
}

/// Body for POST /api/auth/login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Body for POST /api/auth/refresh.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody {
    #[validate(length(min = 1, message = "is required"))]
    pub refresh_token: String,
}

/// Body for POST /api/auth/forgot-password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordBody {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// Body for POST /api/auth/reset-password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordBody {
    #[validate(length(min = 1, message = "is required"))]
    pub token: String,
    #[validate(length(max = 512, message = "is too long"))]
    pub new_password: String,
}

/// Body for PUT /api/auth/password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
    #[validate(length(min = 1, message = "is required"))]
    pub current_password: String,
    #[validate(length(max = 512, message = "is too long"))]
    pub new_password: String,
}

/// Body for PUT /api/posts/{id}/comments updates.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentBody {
    #[validate(length(min = 1, max = 5000, message = "must be 1-5000 characters"))]
    pub content: String,
}

/// Body for POST /api/uploads/presign.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PresignBody {
    #[validate(length(min = 1, max = 255, message = "is required"))]
    pub content_type: String,
    /// Logical folder the keys are generated under.
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub folder: String,
    #[serde(default = "default_key_count")]
    pub key_count: usize,
    /// Keys being replaced by this upload, deleted best-effort.
    #[serde(default)]
    pub old_keys: Vec<String>,
}

fn default_key_count() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_body_rejects_bad_email() {
        let body = RegisterBody {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "not-an-email".into(),
            phone_number: "+15550100".into(),
            password: "x".into(),
        };
        let err = validate(&body).unwrap_err();
        assert!(err.message.contains("email"));
    }

    #[test]
    fn presign_body_defaults() {
        let body: PresignBody = serde_json::from_str(
            r#"{"contentType": "image/png", "folder": "avatars"}"#,
        )
        .unwrap();
        assert_eq!(body.key_count, 1);
        assert!(body.old_keys.is_empty());
    }
}
