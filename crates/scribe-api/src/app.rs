//! Application assembly: wires configuration, database, services, and
//! the router together.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use scribe_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator};
use scribe_core::config::AppConfig;
use scribe_core::result::AppResult;
use scribe_database::DatabaseClient;
use scribe_database::indexes::ensure_indexes;
use scribe_database::repositories::{
    CommentRepository, LikeRepository, PostRepository, SessionRepository, UserRepository,
};
use scribe_service::{
    AuthService, CommentService, LikeService, PostService, SessionService, UserService,
};
use scribe_storage::PresignService;

use crate::router::build_router;
use crate::state::AppState;

/// Connects to the database, ensures indexes, and constructs every
/// repository and service the API depends on.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    let db = Arc::new(DatabaseClient::connect(&config.database).await?);
    ensure_indexes(db.database()).await?;

    let user_repo = Arc::new(UserRepository::new(db.database()));
    let post_repo = Arc::new(PostRepository::new(db.database()));
    let comment_repo = Arc::new(CommentRepository::new(db.database()));
    let like_repo = Arc::new(LikeRepository::new(db.database()));
    let session_repo = Arc::new(SessionRepository::new(db.database()));

    let jwt_encoder = JwtEncoder::new(&config.auth);
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let hasher = PasswordHasher::new();
    let validator = PasswordValidator::new(&config.auth);

    let session_service = Arc::new(SessionService::new(
        Arc::clone(&session_repo),
        config.auth.refresh_ttl_days,
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repo),
        Arc::clone(&session_service),
        hasher,
        validator,
        jwt_encoder,
        config.auth.password_reset_ttl_minutes,
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&session_service),
    ));
    let post_service = Arc::new(PostService::new(Arc::clone(&post_repo)));
    let comment_service = Arc::new(CommentService::new(
        Arc::clone(&comment_repo),
        Arc::clone(&post_repo),
    ));
    let like_service = Arc::new(LikeService::new(
        like_repo,
        Arc::clone(&post_repo),
        Arc::clone(&comment_repo),
    ));
    let presign_service = Arc::new(PresignService::new(&config.storage).await?);

    info!("Application state initialized");

    Ok(AppState {
        config: Arc::new(config),
        db,
        jwt_decoder,
        user_repo,
        post_repo,
        auth_service,
        session_service,
        user_service,
        post_service,
        comment_service,
        like_service,
        presign_service,
    })
}

/// Builds the full application router from prepared state.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}
