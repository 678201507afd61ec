//! Route definitions for the Scribe HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(post_routes())
        .merge(comment_routes())
        .merge(upload_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .nest("/api", api_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: register, login, refresh, logout, passwords, me.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/logout-all", post(handlers::auth::logout_all))
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/auth/forgot-password",
            post(handlers::auth::forgot_password),
        )
        .route("/auth/reset-password", post(handlers::auth::reset_password))
        .route("/auth/password", put(handlers::auth::change_password))
}

/// User profile and administration endpoints.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::get_profile))
        .route("/users/me", put(handlers::user::update_profile))
        .route("/users", get(handlers::user::list_users))
        .route("/users/stats", get(handlers::user::user_stats))
        .route("/users/{id}", get(handlers::user::get_user))
        .route(
            "/users/{id}/deactivate",
            post(handlers::user::deactivate_user),
        )
        .route(
            "/users/{id}/reactivate",
            post(handlers::user::reactivate_user),
        )
        .route("/users/{id}/posts", get(handlers::post::list_posts_by_author))
        .route(
            "/users/{id}/comments",
            get(handlers::comment::list_comments_by_author),
        )
}

/// Post CRUD, lifecycle, listings, and likes.
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(handlers::post::list_posts))
        .route("/posts", post(handlers::post::create_post))
        .route("/posts/stats", get(handlers::post::post_stats))
        .route("/posts/tag/{tag}", get(handlers::post::list_posts_by_tag))
        .route("/posts/slug/{slug}", get(handlers::post::get_post_by_slug))
        .route("/posts/{id}", get(handlers::post::get_post))
        .route("/posts/{id}", put(handlers::post::update_post))
        .route("/posts/{id}", delete(handlers::post::delete_post))
        .route("/posts/{id}/publish", post(handlers::post::publish_post))
        .route("/posts/{id}/unpublish", post(handlers::post::unpublish_post))
        .route("/posts/{id}/archive", post(handlers::post::archive_post))
        .route("/posts/{id}/comments", post(handlers::comment::create_comment))
        .route("/posts/{id}/comments", get(handlers::comment::list_comments))
        .route("/posts/{id}/like", post(handlers::like::like_post))
        .route("/posts/{id}/like", delete(handlers::like::unlike_post))
        .route("/posts/{id}/like", get(handlers::like::post_like_status))
        .route("/posts/{id}/likes", get(handlers::like::list_post_likes))
}

/// Comment CRUD, replies, moderation, and likes.
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments/{id}", get(handlers::comment::get_comment))
        .route("/comments/{id}", put(handlers::comment::update_comment))
        .route("/comments/{id}", delete(handlers::comment::delete_comment))
        .route(
            "/comments/{id}/replies",
            get(handlers::comment::list_replies),
        )
        .route("/comments/{id}/spam", post(handlers::comment::mark_spam))
        .route("/comments/{id}/like", post(handlers::like::like_comment))
        .route("/comments/{id}/like", delete(handlers::like::unlike_comment))
        .route(
            "/comments/{id}/like",
            get(handlers::like::comment_like_status),
        )
}

/// Presigned-upload endpoints.
fn upload_routes() -> Router<AppState> {
    Router::new().route("/uploads/presign", post(handlers::upload::presign_upload))
}

/// Health check endpoints (no auth required).
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build CORS layer from configuration.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use http::Method;
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors.max_age(Duration::from_secs(cors_config.max_age_seconds))
}
