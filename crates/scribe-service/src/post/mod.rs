//! Post authoring and publishing.

pub mod service;
pub mod slug;

pub use service::{CreatePostRequest, PostService, UpdatePostRequest};
