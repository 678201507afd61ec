//! JWT access-token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use scribe_core::config::auth::AuthConfig;
use scribe_core::error::AppError;

use super::claims::Claims;

/// Validates JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Session liveness is checked separately at the request boundary;
    /// this only proves the token's signature and expiry.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use bson::oid::ObjectId;
    use scribe_entity::UserRole;

    fn config() -> AuthConfig {
        serde_json::from_value(serde_json::json!({
            "jwt_secret": "test-secret",
        }))
        .unwrap()
    }

    #[test]
    fn encode_decode_roundtrip() {
        let cfg = config();
        let encoder = JwtEncoder::new(&cfg);
        let decoder = JwtDecoder::new(&cfg);

        let user = ObjectId::new();
        let session = ObjectId::new();
        let (token, _exp) = encoder
            .generate_access_token(user, session, UserRole::Admin, "ada@example.com")
            .unwrap();

        let claims = decoder.decode_access_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user);
        assert_eq!(claims.session_id().unwrap(), session);
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let encoder = JwtEncoder::new(&config());
        let other: AuthConfig = serde_json::from_value(serde_json::json!({
            "jwt_secret": "different-secret",
        }))
        .unwrap();
        let decoder = JwtDecoder::new(&other);

        let (token, _) = encoder
            .generate_access_token(ObjectId::new(), ObjectId::new(), UserRole::User, "a@b.c")
            .unwrap();
        let err = decoder.decode_access_token(&token).unwrap_err();
        assert_eq!(err.kind, scribe_core::error::ErrorKind::Authentication);
    }

    #[test]
    fn rejects_garbage_token() {
        let decoder = JwtDecoder::new(&config());
        assert!(decoder.decode_access_token("not.a.jwt").is_err());
    }
}
