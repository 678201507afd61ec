//! Comment handlers — threads, replies, and moderation.

use axum::Json;
use axum::extract::{Path, State};

use scribe_core::types::Paginated;
use scribe_service::comment::CreateCommentRequest;

use crate::dto::request::{UpdateCommentBody, validate};
use crate::dto::response::{
    ApiResponse, CommentResponse, CommentWithAuthorResponse, MessageResponse,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, Pagination, parse_object_id};
use crate::state::AppState;

/// POST /api/posts/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<Json<ApiResponse<CommentResponse>>, ApiError> {
    let post_id = parse_object_id(&id)?;
    let comment = state.comment_service.create(&auth, post_id, body).await?;
    Ok(Json(ApiResponse::ok(CommentResponse::from(comment))))
}

/// GET /api/posts/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Pagination(query): Pagination,
) -> Result<Json<Paginated<CommentWithAuthorResponse>>, ApiError> {
    let post_id = parse_object_id(&id)?;
    let page = state.comment_service.list_for_post(post_id, &query).await?;
    Ok(Json(page.map(CommentWithAuthorResponse::from)))
}

/// GET /api/comments/{id}/replies
pub async fn list_replies(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Pagination(query): Pagination,
) -> Result<Json<Paginated<CommentWithAuthorResponse>>, ApiError> {
    let parent_id = parse_object_id(&id)?;
    let page = state
        .comment_service
        .list_replies(parent_id, &query)
        .await?;
    Ok(Json(page.map(CommentWithAuthorResponse::from)))
}

/// GET /api/users/{id}/comments
pub async fn list_comments_by_author(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Pagination(query): Pagination,
) -> Result<Json<Paginated<CommentWithAuthorResponse>>, ApiError> {
    let author = parse_object_id(&id)?;
    let page = state
        .comment_service
        .list_by_author(&auth, author, &query)
        .await?;
    Ok(Json(page.map(CommentWithAuthorResponse::from)))
}

/// GET /api/comments/{id}
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CommentResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    let comment = state.comment_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok(CommentResponse::from(comment))))
}

/// PUT /api/comments/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateCommentBody>,
) -> Result<Json<ApiResponse<CommentResponse>>, ApiError> {
    validate(&body)?;
    let id = parse_object_id(&id)?;
    let comment = state
        .comment_service
        .update_content(&auth, id, body.content)
        .await?;
    Ok(Json(ApiResponse::ok(CommentResponse::from(comment))))
}

/// POST /api/comments/{id}/spam (admin)
pub async fn mark_spam(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CommentResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    let comment = state.comment_service.mark_spam(&auth, id).await?;
    Ok(Json(ApiResponse::ok(CommentResponse::from(comment))))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    state.comment_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Comment deleted",
    ))))
}
