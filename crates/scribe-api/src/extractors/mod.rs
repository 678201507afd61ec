//! Request extractors.

pub mod auth;
pub mod pagination;
pub mod path;

pub use auth::{AuthUser, OptionalAuthUser};
pub use pagination::Pagination;
pub use path::parse_object_id;
