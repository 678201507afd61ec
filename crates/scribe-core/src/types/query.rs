//! Query predicate and relation descriptor types.
//!
//! Predicates are an explicit tagged representation of the filters the
//! repository layer accepts. They are lowered to driver documents only at
//! the storage boundary, so services never build raw query documents.

use bson::Bson;
use serde::{Deserialize, Serialize};

/// A filter predicate over document fields.
///
/// No local validation is performed; a predicate that the storage engine
/// rejects surfaces as a driver error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Exact equality on a field.
    Eq(String, Bson),
    /// Inequality on a field.
    Ne(String, Bson),
    /// Half-open range on a field: inclusive lower bound, exclusive upper.
    Range {
        field: String,
        gte: Option<Bson>,
        lt: Option<Bson>,
    },
    /// Substring/regex match on a string field.
    Regex {
        field: String,
        pattern: String,
        case_insensitive: bool,
    },
    /// Membership in a value list.
    In(String, Vec<Bson>),
    /// Presence (or absence) of a field.
    Exists(String, bool),
    /// Conjunction of predicates.
    And(Vec<Predicate>),
    /// Disjunction of predicates.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Shorthand for an equality predicate.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    /// Shorthand for an inequality predicate.
    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Ne(field.into(), value.into())
    }

    /// Shorthand for a case-insensitive substring match.
    pub fn contains(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self::Regex {
            field: field.into(),
            pattern: term.into(),
            case_insensitive: true,
        }
    }

    /// AND this predicate with another, flattening nested conjunctions.
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Self::And(mut preds) => {
                preds.push(other);
                Self::And(preds)
            }
            pred => Self::And(vec![pred, other]),
        }
    }
}

/// An ad-hoc search criterion: case-insensitive substring match on a
/// caller-supplied field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriterion {
    /// The field to search.
    pub field: String,
    /// The raw search term (treated as a substring, not a regex).
    pub value: String,
}

impl SearchCriterion {
    /// Create a new search criterion.
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A static relation descriptor: how to resolve a reference field into an
/// embedded document during aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// The foreign collection to join.
    pub from: &'static str,
    /// The local reference field.
    pub local_field: &'static str,
    /// The foreign field matched against (normally `_id`).
    pub foreign_field: &'static str,
    /// The output field the joined document is embedded under.
    pub as_field: &'static str,
    /// Fields to project from the joined document (None = whole document).
    pub select: Option<&'static [&'static str]>,
}

/// Per-query relation selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Relation {
    /// Resolve no relations.
    #[default]
    None,
    /// Resolve the repository's declared default relations.
    Default,
    /// Resolve exactly the given joins.
    Explicit(Vec<Join>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_flattens_existing_conjunction() {
        let p = Predicate::eq("status", "PUBLISHED")
            .and(Predicate::eq("deleted", false))
            .and(Predicate::Exists("publishedAt".into(), true));
        match p {
            Predicate::And(preds) => assert_eq!(preds.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn contains_is_case_insensitive() {
        let p = Predicate::contains("slug", "rust");
        assert_eq!(
            p,
            Predicate::Regex {
                field: "slug".into(),
                pattern: "rust".into(),
                case_insensitive: true,
            }
        );
    }
}
