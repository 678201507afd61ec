//! Commenting and moderation.

pub mod service;

pub use service::{CommentService, CreateCommentRequest};
