//! Like handlers for posts and comments.

use axum::Json;
use axum::extract::{Path, State};

use scribe_core::types::Paginated;
use scribe_entity::LikeTarget;

use crate::dto::response::{ApiResponse, LikeResponse, LikeStatusResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, Pagination, parse_object_id};
use crate::state::AppState;

/// POST /api/posts/{id}/like
pub async fn like_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    like(state, auth, &id, LikeTarget::Post).await
}

/// DELETE /api/posts/{id}/like
pub async fn unlike_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    unlike(state, auth, &id, LikeTarget::Post).await
}

/// GET /api/posts/{id}/like
pub async fn post_like_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LikeStatusResponse>>, ApiError> {
    like_status(state, auth, &id, LikeTarget::Post).await
}

/// GET /api/posts/{id}/likes
pub async fn list_post_likes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Pagination(query): Pagination,
) -> Result<Json<Paginated<LikeResponse>>, ApiError> {
    let target = parse_object_id(&id)?;
    let page = state
        .like_service
        .list_for_target(target, LikeTarget::Post, &query)
        .await?;
    Ok(Json(page.map(LikeResponse::from)))
}

/// POST /api/comments/{id}/like
pub async fn like_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    like(state, auth, &id, LikeTarget::Comment).await
}

/// DELETE /api/comments/{id}/like
pub async fn unlike_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    unlike(state, auth, &id, LikeTarget::Comment).await
}

/// GET /api/comments/{id}/like
pub async fn comment_like_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LikeStatusResponse>>, ApiError> {
    like_status(state, auth, &id, LikeTarget::Comment).await
}

async fn like(
    state: AppState,
    auth: AuthUser,
    raw_id: &str,
    kind: LikeTarget,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    let target = parse_object_id(raw_id)?;
    let like = state.like_service.like(&auth, target, kind).await?;
    Ok(Json(ApiResponse::ok(LikeResponse::from(like))))
}

async fn unlike(
    state: AppState,
    auth: AuthUser,
    raw_id: &str,
    kind: LikeTarget,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let target = parse_object_id(raw_id)?;
    state.like_service.unlike(&auth, target, kind).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Like removed"))))
}

async fn like_status(
    state: AppState,
    auth: AuthUser,
    raw_id: &str,
    kind: LikeTarget,
) -> Result<Json<ApiResponse<LikeStatusResponse>>, ApiError> {
    let target = parse_object_id(raw_id)?;
    let liked = state.like_service.is_liked(&auth, target, kind).await?;
    let like_count = state.like_service.count(target, kind).await?;
    Ok(Json(ApiResponse::ok(LikeStatusResponse {
        liked,
        like_count,
    })))
}
