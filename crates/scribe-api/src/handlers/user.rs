//! User handlers — profiles and account administration.

use axum::Json;
use axum::extract::{Path, State};

use scribe_core::types::Paginated;
use scribe_database::repository::CountSummary;
use scribe_service::user::UpdateProfileRequest;

use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, Pagination, parse_object_id};
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.update_profile(&auth, body).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// GET /api/users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(query): Pagination,
) -> Result<Json<Paginated<UserResponse>>, ApiError> {
    let page = state.user_service.list(&auth, &query).await?;
    Ok(Json(page.map(UserResponse::from)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    let user = state.user_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// POST /api/users/{id}/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    state.user_service.deactivate(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Account deactivated",
    ))))
}

/// POST /api/users/{id}/reactivate (admin)
pub async fn reactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    let user = state.user_service.reactivate(&auth, id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// GET /api/users/stats (admin)
pub async fn user_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountSummary>>, ApiError> {
    let counts = state.user_service.counts_by_role(&auth).await?;
    Ok(Json(ApiResponse::ok(counts)))
}
