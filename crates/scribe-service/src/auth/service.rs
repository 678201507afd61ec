//! Registration, login, token refresh, and password lifecycle.

use std::sync::Arc;

use bson::DateTime;
use bson::doc;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use scribe_auth::token::generate_reset_token;
use scribe_auth::{JwtEncoder, PasswordHasher, PasswordValidator};
use scribe_core::error::AppError;
use scribe_core::result::AppResult;
use scribe_database::repositories::UserRepository;
use scribe_entity::User;

use crate::context::RequestContext;
use crate::session::SessionService;

/// Input for registering a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

/// Token pair issued on login and refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Short-lived JWT access token.
    pub access_token: String,
    /// When the access token expires.
    pub access_token_expires_at: chrono::DateTime<Utc>,
    /// Opaque refresh token, valid until its session expires.
    pub refresh_token: String,
}

/// Result of a successful login or refresh.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: AuthTokens,
}

/// Orchestrates authentication: credentials, sessions, and tokens.
#[derive(Debug, Clone)]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    sessions: Arc<SessionService>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    /// Password-reset token TTL in minutes.
    reset_ttl_minutes: u64,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        sessions: Arc<SessionService>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        encoder: JwtEncoder,
        reset_ttl_minutes: u64,
    ) -> Self {
        Self {
            user_repo,
            sessions,
            hasher,
            validator,
            encoder,
            reset_ttl_minutes,
        }
    }

    /// Registers a new user account.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        let email = normalize_email(&request.email);
        let phone = request.phone_number.trim().to_string();

        self.validator.validate(&request.password)?;

        if self.user_repo.email_taken(&email).await? {
            return Err(AppError::conflict("Email address is already registered"));
        }
        if self.user_repo.phone_taken(&phone).await? {
            return Err(AppError::conflict("Phone number is already registered"));
        }

        let hash = self.hasher.hash_password(&request.password)?;
        let user = User::new(
            request.first_name.trim(),
            request.last_name.trim(),
            email,
            phone,
            hash,
        );
        let user = self.user_repo.base().create(user, None).await?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Authenticates a user and opens a session.
    ///
    /// Failure reasons are deliberately indistinguishable to the caller.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        user_agent: Option<String>,
    ) -> AppResult<LoginOutcome> {
        let email = normalize_email(email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid email or password"))?;

        if !user.can_login() {
            warn!(user_id = %user.id, "Login attempt on deactivated account");
            return Err(AppError::authentication("Invalid email or password"));
        }
        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::authentication("Invalid email or password"));
        }

        let session = self.sessions.create(user.id, user_agent).await?;
        let (access_token, expires_at) =
            self.encoder
                .generate_access_token(user.id, session.id, user.role, &user.email)?;

        let user = self
            .user_repo
            .update_by_id(
                user.id,
                doc! { "$set": { "lastLoginAt": DateTime::now() } },
                None,
            )
            .await?
            .ok_or_else(|| AppError::internal("User vanished during login"))?;

        info!(user_id = %user.id, session_id = %session.id, "User logged in");
        Ok(LoginOutcome {
            user,
            tokens: AuthTokens {
                access_token,
                access_token_expires_at: expires_at,
                refresh_token: session.refresh_token,
            },
        })
    }

    /// Exchanges a refresh token for a fresh token pair, rotating the session.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<LoginOutcome> {
        let session = self.sessions.validate_refresh_token(refresh_token).await?;
        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| AppError::authentication("Account no longer exists"))?;

        if !user.can_login() {
            self.sessions.revoke(session.id, None).await?;
            return Err(AppError::authentication("Account is deactivated"));
        }

        let session = self.sessions.rotate(&session).await?;
        let (access_token, expires_at) =
            self.encoder
                .generate_access_token(user.id, session.id, user.role, &user.email)?;

        Ok(LoginOutcome {
            user,
            tokens: AuthTokens {
                access_token,
                access_token_expires_at: expires_at,
                refresh_token: session.refresh_token,
            },
        })
    }

    /// Ends the current session.
    pub async fn logout(&self, ctx: &RequestContext) -> AppResult<()> {
        self.sessions
            .revoke(ctx.session_id, Some(ctx.user_id))
            .await
    }

    /// Ends every session the current user holds.
    pub async fn logout_all(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.sessions.revoke_all(ctx.user_id, Some(ctx.user_id)).await
    }

    /// Begins the password-reset flow.
    ///
    /// Returns the reset token when the email matches an account, `None`
    /// otherwise, so the caller can respond identically either way.
    pub async fn forgot_password(&self, email: &str) -> AppResult<Option<String>> {
        let email = normalize_email(email);
        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            return Ok(None);
        };

        let token = generate_reset_token();
        let expires = DateTime::from_millis(
            DateTime::now().timestamp_millis() + (self.reset_ttl_minutes as i64) * 60_000,
        );
        self.user_repo
            .update_by_id(
                user.id,
                doc! { "$set": {
                    "passwordResetToken": &token,
                    "passwordResetExpires": expires,
                }},
                None,
            )
            .await?;

        info!(user_id = %user.id, "Password reset requested");
        Ok(Some(token))
    }

    /// Completes a password reset using a previously issued token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        let user = self
            .user_repo
            .find_by_reset_token(token)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid or expired reset token"))?;

        let expired = user
            .password_reset_expires
            .map(|exp| exp.timestamp_millis() < DateTime::now().timestamp_millis())
            .unwrap_or(true);
        if expired {
            return Err(AppError::authentication("Invalid or expired reset token"));
        }

        self.validator.validate(new_password)?;
        let hash = self.hasher.hash_password(new_password)?;

        self.user_repo
            .update_by_id(
                user.id,
                doc! {
                    "$set": { "passwordHash": hash },
                    "$unset": { "passwordResetToken": "", "passwordResetExpires": "" },
                },
                None,
            )
            .await?;

        // Any stolen session dies with the old password.
        self.sessions.revoke_all(user.id, Some(user.id)).await?;
        info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }

    /// Changes the password of the authenticated user.
    ///
    /// All sessions are revoked afterwards; the client must log in again.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self
            .user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::authentication("Current password is incorrect"));
        }

        self.validator
            .validate_not_same(current_password, new_password)?;
        self.validator.validate(new_password)?;

        let hash = self.hasher.hash_password(new_password)?;
        self.user_repo
            .update_by_id(user.id, doc! { "$set": { "passwordHash": hash } }, None)
            .await?;

        self.sessions.revoke_all(user.id, Some(user.id)).await?;
        info!(user_id = %user.id, "Password changed");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
        assert_eq!(normalize_email("plain@host.io"), "plain@host.io");
    }
}
