//! Post handlers — authoring, publishing lifecycle, and listings.

use axum::Json;
use axum::extract::{Path, State};

use scribe_core::types::Paginated;
use scribe_database::repository::CountSummary;
use scribe_service::post::{CreatePostRequest, UpdatePostRequest};

use crate::dto::response::{
    ApiResponse, MessageResponse, PostResponse, PostWithAuthorResponse,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, OptionalAuthUser, Pagination, parse_object_id};
use crate::state::AppState;

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreatePostRequest>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let post = state.post_service.create(&auth, body).await?;
    Ok(Json(ApiResponse::ok(PostResponse::from(post))))
}

/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Pagination(query): Pagination,
) -> Result<Json<Paginated<PostWithAuthorResponse>>, ApiError> {
    let page = state.post_service.list_published(&query).await?;
    Ok(Json(page.map(PostWithAuthorResponse::from)))
}

/// GET /api/posts/tag/{tag}
pub async fn list_posts_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Pagination(query): Pagination,
) -> Result<Json<Paginated<PostWithAuthorResponse>>, ApiError> {
    let page = state.post_service.list_by_tag(&tag, &query).await?;
    Ok(Json(page.map(PostWithAuthorResponse::from)))
}

/// GET /api/users/{id}/posts
pub async fn list_posts_by_author(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Pagination(query): Pagination,
) -> Result<Json<Paginated<PostWithAuthorResponse>>, ApiError> {
    let author = parse_object_id(&id)?;
    let page = state
        .post_service
        .list_by_author(&auth, author, &query)
        .await?;
    Ok(Json(page.map(PostWithAuthorResponse::from)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    let post = state.post_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok(PostResponse::from(post))))
}

/// GET /api/posts/slug/{slug}
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let post = state
        .post_service
        .get_by_slug(&slug, viewer.0.as_ref())
        .await?;
    Ok(Json(ApiResponse::ok(PostResponse::from(post))))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdatePostRequest>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    let post = state.post_service.update(&auth, id, body).await?;
    Ok(Json(ApiResponse::ok(PostResponse::from(post))))
}

/// POST /api/posts/{id}/publish
pub async fn publish_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    let post = state.post_service.publish(&auth, id).await?;
    Ok(Json(ApiResponse::ok(PostResponse::from(post))))
}

/// POST /api/posts/{id}/unpublish
pub async fn unpublish_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    let post = state.post_service.unpublish(&auth, id).await?;
    Ok(Json(ApiResponse::ok(PostResponse::from(post))))
}

/// POST /api/posts/{id}/archive
pub async fn archive_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    let post = state.post_service.archive(&auth, id).await?;
    Ok(Json(ApiResponse::ok(PostResponse::from(post))))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = parse_object_id(&id)?;
    state.post_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Post deleted"))))
}

/// GET /api/posts/stats (admin)
pub async fn post_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountSummary>>, ApiError> {
    let counts = state.post_service.counts_by_status(&auth).await?;
    Ok(Json(ApiResponse::ok(counts)))
}
