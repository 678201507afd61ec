//! # scribe-database
//!
//! MongoDB access layer for Scribe. The center of this crate is
//! [`MongoRepository`], a generic repository over any
//! [`scribe_core::traits::Entity`] that provides CRUD, soft deletion,
//! filtered counts, and a single-pipeline pagination engine with relation
//! resolution. Typed repositories in [`repositories`] wrap it with
//! per-collection metadata and domain queries.

pub mod connection;
pub mod filter;
pub mod indexes;
pub mod repositories;
pub mod repository;
pub mod views;

pub use connection::DatabaseClient;
pub use filter::FilterSpec;
pub use repository::{CollectionSpec, CountSummary, GroupCount, MongoRepository};
