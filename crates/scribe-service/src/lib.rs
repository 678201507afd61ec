//! # scribe-service
//!
//! Business logic service layer for Scribe. Each service orchestrates
//! repositories and authentication primitives to implement
//! application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod comment;
pub mod context;
pub mod like;
pub mod post;
pub mod session;
pub mod user;

pub use auth::AuthService;
pub use comment::CommentService;
pub use context::RequestContext;
pub use like::LikeService;
pub use post::PostService;
pub use session::SessionService;
pub use user::UserService;
