//! Session entity model.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use scribe_core::traits::Entity;

/// An active refresh-token session.
///
/// Sessions are created on login and revoked on logout, refresh rotation,
/// or expiry. Access tokens carry the session id so revocation takes
/// effect before the access token itself expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// The user this session belongs to.
    pub user_id: ObjectId,
    /// Opaque refresh token (unique).
    pub refresh_token: String,
    /// When the session expires (absolute timeout).
    pub expires_at: DateTime,
    /// User-Agent header value at login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    // -- Audit block --
    /// When the session was created (login time).
    pub created_at: DateTime,
    /// When the session was last updated.
    pub updated_at: DateTime,
    /// Soft-delete marker (set on revocation).
    #[serde(default)]
    pub deleted: bool,
    /// When the session was revoked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
    /// Who revoked the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<ObjectId>,
}

impl Session {
    /// Create a new session for a user.
    pub fn new(
        user_id: ObjectId,
        refresh_token: impl Into<String>,
        expires_at: DateTime,
        user_agent: Option<String>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            user_id,
            refresh_token: refresh_token.into(),
            expires_at,
            user_agent,
            created_at: now,
            updated_at: now,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= DateTime::now()
    }

    /// Check whether the session is still usable.
    pub fn is_active(&self) -> bool {
        !self.deleted && !self.is_expired()
    }
}

impl Entity for Session {
    const COLLECTION: &'static str = "sessions";

    fn id(&self) -> ObjectId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_active() {
        let expires = DateTime::from_millis(DateTime::now().timestamp_millis() + 60_000);
        let session = Session::new(ObjectId::new(), "tok", expires, None);
        assert!(session.is_active());
        assert!(!session.is_expired());
    }

    #[test]
    fn expired_session_is_not_active() {
        let expires = DateTime::from_millis(DateTime::now().timestamp_millis() - 1_000);
        let session = Session::new(ObjectId::new(), "tok", expires, None);
        assert!(session.is_expired());
        assert!(!session.is_active());
    }
}
