//! Application state shared across all handlers.

use std::sync::Arc;

use scribe_auth::JwtDecoder;
use scribe_core::config::AppConfig;
use scribe_database::DatabaseClient;
use scribe_database::repositories::{PostRepository, UserRepository};
use scribe_service::{
    AuthService, CommentService, LikeService, PostService, SessionService, UserService,
};
use scribe_storage::PresignService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database client (health checks).
    pub db: Arc<DatabaseClient>,

    /// JWT access-token validator.
    pub jwt_decoder: Arc<JwtDecoder>,

    /// User repository (direct lookups in extractors/handlers).
    pub user_repo: Arc<UserRepository>,
    /// Post repository.
    pub post_repo: Arc<PostRepository>,

    /// Authentication service.
    pub auth_service: Arc<AuthService>,
    /// Session service (liveness checks at the request boundary).
    pub session_service: Arc<SessionService>,
    /// User service.
    pub user_service: Arc<UserService>,
    /// Post service.
    pub post_service: Arc<PostService>,
    /// Comment service.
    pub comment_service: Arc<CommentService>,
    /// Like service.
    pub like_service: Arc<LikeService>,
    /// Presigned-upload service.
    pub presign_service: Arc<PresignService>,
}
