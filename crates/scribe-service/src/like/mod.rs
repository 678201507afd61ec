//! Likes on posts and comments.

pub mod service;

pub use service::LikeService;
