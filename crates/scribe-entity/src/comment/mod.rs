//! Comment domain entities.

pub mod model;
pub mod status;

pub use model::Comment;
pub use status::CommentStatus;
