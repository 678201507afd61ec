//! # scribe-entity
//!
//! Domain entity models for Scribe. Every model in this crate represents a
//! document in its own collection and carries the common audit block
//! (creation/update timestamps plus soft-delete markers). All entities
//! derive `Debug`, `Clone`, `Serialize`, and `Deserialize`, serialize their
//! fields in camelCase, and implement [`scribe_core::traits::Entity`].

pub mod comment;
pub mod like;
pub mod post;
pub mod session;
pub mod user;

pub use comment::{Comment, CommentStatus};
pub use like::{Like, LikeTarget};
pub use post::{Post, PostStatus};
pub use session::Session;
pub use user::{User, UserRole};
