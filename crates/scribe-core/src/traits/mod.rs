//! Core traits implemented across crates.

pub mod entity;

pub use entity::Entity;
