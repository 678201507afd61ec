//! Like domain entities.

pub mod model;
pub mod target;

pub use model::Like;
pub use target::LikeTarget;
