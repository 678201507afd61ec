//! Typed repositories, one per entity collection.
//!
//! Each repository wraps the generic [`crate::MongoRepository`] with the
//! collection's query-surface metadata and domain-specific queries.

pub mod comment;
pub mod like;
pub mod post;
pub mod session;
pub mod user;

pub use comment::CommentRepository;
pub use like::LikeRepository;
pub use post::PostRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
