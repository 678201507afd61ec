//! Shared types used across crates.

pub mod pagination;
pub mod query;

pub use pagination::{PageMeta, PageQuery, Paginated, SortOrder};
pub use query::{Join, Predicate, Relation, SearchCriterion};
