//! JWT claims structure embedded in access tokens.

use bson::oid::ObjectId;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use scribe_core::error::AppError;
use scribe_entity::UserRole;

/// JWT claims payload embedded in every access token.
///
/// Object ids are carried as hex strings so the token stays portable
/// across clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user id (hex).
    pub sub: String,
    /// The session this token is bound to (hex).
    pub sid: String,
    /// User role at the time of token issuance.
    pub role: UserRole,
    /// Email for convenience.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Parse the subject claim back into a user id.
    pub fn user_id(&self) -> Result<ObjectId, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::authentication("Malformed subject claim"))
    }

    /// Parse the session claim back into a session id.
    pub fn session_id(&self) -> Result<ObjectId, AppError> {
        self.sid
            .parse()
            .map_err(|_| AppError::authentication("Malformed session claim"))
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_id_claims() {
        let user = ObjectId::new();
        let session = ObjectId::new();
        let claims = Claims {
            sub: user.to_hex(),
            sid: session.to_hex(),
            role: UserRole::User,
            email: "ada@example.com".into(),
            iat: 0,
            exp: i64::MAX,
        };
        assert_eq!(claims.user_id().unwrap(), user);
        assert_eq!(claims.session_id().unwrap(), session);
        assert!(!claims.is_expired());
    }

    #[test]
    fn rejects_malformed_subject() {
        let claims = Claims {
            sub: "not-an-id".into(),
            sid: ObjectId::new().to_hex(),
            role: UserRole::User,
            email: "ada@example.com".into(),
            iat: 0,
            exp: 0,
        };
        assert!(claims.user_id().is_err());
        assert!(claims.is_expired());
    }
}
