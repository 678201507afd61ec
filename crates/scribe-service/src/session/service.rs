//! Refresh-token session lifecycle.

use std::sync::Arc;

use bson::DateTime;
use bson::oid::ObjectId;
use tracing::info;

use scribe_auth::token::generate_refresh_token;
use scribe_core::error::AppError;
use scribe_core::result::AppResult;
use scribe_database::repositories::SessionRepository;
use scribe_entity::Session;

/// Manages refresh-token sessions.
#[derive(Debug, Clone)]
pub struct SessionService {
    /// Session repository.
    session_repo: Arc<SessionRepository>,
    /// Session TTL in days.
    ttl_days: u64,
}

impl SessionService {
    /// Creates a new session service.
    pub fn new(session_repo: Arc<SessionRepository>, ttl_days: u64) -> Self {
        Self {
            session_repo,
            ttl_days,
        }
    }

    /// Creates a session for a user with a fresh refresh token.
    pub async fn create(
        &self,
        user_id: ObjectId,
        user_agent: Option<String>,
    ) -> AppResult<Session> {
        let refresh_token = generate_refresh_token();
        let expires_at = DateTime::from_millis(
            DateTime::now().timestamp_millis() + (self.ttl_days as i64) * 86_400_000,
        );
        let session = Session::new(user_id, refresh_token, expires_at, user_agent);
        let session = self.session_repo.base().create(session, None).await?;
        info!(user_id = %user_id, session_id = %session.id, "Session created");
        Ok(session)
    }

    /// Resolves a refresh token to its live session.
    ///
    /// An expired session is revoked lazily on the way out.
    pub async fn validate_refresh_token(&self, token: &str) -> AppResult<Session> {
        let session = self
            .session_repo
            .find_by_refresh_token(token)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid refresh token"))?;

        if session.is_expired() {
            self.session_repo.revoke(session.id, None, None).await?;
            return Err(AppError::authentication("Refresh token has expired"));
        }
        Ok(session)
    }

    /// Checks that a session is still live (used by the request guard).
    pub async fn is_live(&self, session_id: ObjectId) -> AppResult<bool> {
        Ok(self
            .session_repo
            .find_by_id(session_id)
            .await?
            .map(|s| s.is_active())
            .unwrap_or(false))
    }

    /// Rotates a session: revokes the old one and issues a replacement.
    pub async fn rotate(&self, session: &Session) -> AppResult<Session> {
        self.session_repo.revoke(session.id, None, None).await?;
        self.create(session.user_id, session.user_agent.clone())
            .await
    }

    /// Revokes a single session.
    pub async fn revoke(&self, session_id: ObjectId, by: Option<ObjectId>) -> AppResult<()> {
        self.session_repo.revoke(session_id, by, None).await?;
        info!(session_id = %session_id, "Session revoked");
        Ok(())
    }

    /// Revokes every session a user holds, returning the count.
    pub async fn revoke_all(&self, user_id: ObjectId, by: Option<ObjectId>) -> AppResult<u64> {
        let count = self.session_repo.revoke_all_for_user(user_id, by).await?;
        info!(user_id = %user_id, count, "All sessions revoked");
        Ok(count)
    }

    /// Physically removes sessions that expired before now.
    pub async fn cleanup_expired(&self) -> AppResult<u64> {
        let removed = self.session_repo.delete_expired(DateTime::now()).await?;
        if removed > 0 {
            info!(removed, "Expired sessions cleaned up");
        }
        Ok(removed)
    }
}
