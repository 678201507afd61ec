//! Auth handlers — register, login, refresh, logout, passwords.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;

use scribe_service::auth::RegisterRequest;

use crate::dto::request::{
    ChangePasswordBody, ForgotPasswordBody, LoginBody, RefreshBody, RegisterBody,
    ResetPasswordBody, validate,
};
use crate::dto::response::{ApiResponse, AuthResponse, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    validate(&body)?;

    let user = state
        .auth_service
        .register(RegisterRequest {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone_number: body.phone_number,
            password: body.password,
        })
        .await?;

    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginBody>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    validate(&body)?;

    let outcome = state
        .auth_service
        .login(&body.email, &body.password, user_agent(&headers))
        .await?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        user: UserResponse::from(outcome.user),
        tokens: outcome.tokens,
    })))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshBody>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    validate(&body)?;

    let outcome = state.auth_service.refresh(&body.refresh_token).await?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        user: UserResponse::from(outcome.user),
        tokens: outcome.tokens,
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.auth_service.logout(&auth).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// POST /api/auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let count = state.auth_service.logout_all(&auth).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "Ended {count} sessions"
    )))))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// POST /api/auth/forgot-password
///
/// Always responds with the same message, whether or not the email
/// matched an account.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordBody>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    validate(&body)?;
    state.auth_service.forgot_password(&body.email).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "If that email is registered, a reset link has been sent",
    ))))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordBody>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    validate(&body)?;
    state
        .auth_service
        .reset_password(&body.token, &body.new_password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password has been reset. Please log in.",
    ))))
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ChangePasswordBody>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    validate(&body)?;
    state
        .auth_service
        .change_password(&auth, &body.current_password, &body.new_password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password changed. Please log in again.",
    ))))
}
