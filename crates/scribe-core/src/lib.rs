//! # scribe-core
//!
//! Core crate for Scribe. Contains configuration schemas, pagination and
//! query predicate types, the entity trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Scribe crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
