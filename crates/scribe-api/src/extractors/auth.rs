//! `AuthUser` extractor — pulls the JWT from the Authorization header,
//! validates it, checks session liveness, and injects request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use scribe_core::error::AppError;
use scribe_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Like [`AuthUser`], but absent credentials yield `None` instead of 401.
///
/// Presented-but-invalid credentials still fail the request.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<RequestContext>);

async fn authenticate(parts: &Parts, state: &AppState) -> Result<RequestContext, AppError> {
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

    let claims = state.jwt_decoder.decode_access_token(token)?;
    let session_id = claims.session_id()?;

    // The token may outlive its session (logout, revocation).
    if !state.session_service.is_live(session_id).await? {
        return Err(AppError::authentication("Session is no longer active"));
    }

    let user_agent = parts
        .headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    Ok(RequestContext::new(
        claims.user_id()?,
        session_id,
        claims.role,
        claims.email,
        user_agent,
    ))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = authenticate(parts, state).await?;
        Ok(AuthUser(ctx))
    }
}

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key("authorization") {
            return Ok(OptionalAuthUser(None));
        }
        let ctx = authenticate(parts, state).await?;
        Ok(OptionalAuthUser(Some(ctx)))
    }
}
