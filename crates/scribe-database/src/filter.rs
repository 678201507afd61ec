//! Predicate lowering and filter composition.
//!
//! Services describe filters with [`Predicate`] values; this module lowers
//! them to driver documents at the storage boundary. Composition follows a
//! fixed recipe: caller base filter, then the implicit not-deleted guard,
//! then date-range normalization, then ad-hoc search criteria, which are
//! OR-combined into a single `$or` clause. Free-text search over the
//! collection's declared fields is a separate stage built by
//! [`search_stage`].
//!
//! Nothing here validates field names or value types; a filter the storage
//! engine rejects surfaces as a driver error.

use bson::{Bson, DateTime, Document, doc};
use serde::{Deserialize, Serialize};

use scribe_core::types::{Predicate, SearchCriterion};

/// A normalized half-open date range on a timestamp field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// The timestamp field the range applies to.
    pub field: String,
    /// Inclusive lower bound.
    pub gte: Option<DateTime>,
    /// Exclusive upper bound.
    pub lt: Option<DateTime>,
}

impl DateRange {
    /// Range over `createdAt`, the usual case.
    pub fn created(gte: Option<DateTime>, lt: Option<DateTime>) -> Self {
        Self {
            field: "createdAt".to_string(),
            gte,
            lt,
        }
    }

    fn is_empty(&self) -> bool {
        self.gte.is_none() && self.lt.is_none()
    }
}

/// The inputs to filter composition for a single query.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Caller-supplied base filter.
    pub base: Option<Predicate>,
    /// Whether soft-deleted documents are visible to this query.
    pub include_deleted: bool,
    /// Optional date-range restriction.
    pub date_range: Option<DateRange>,
    /// Ad-hoc per-field search criteria (case-insensitive substring,
    /// OR-combined).
    pub criteria: Vec<SearchCriterion>,
}

impl FilterSpec {
    /// A spec with only the implicit not-deleted guard.
    pub fn active() -> Self {
        Self::default()
    }

    /// A spec over the given base filter, excluding soft-deleted documents.
    pub fn with_base(base: Predicate) -> Self {
        Self {
            base: Some(base),
            ..Self::default()
        }
    }

    /// Same as [`FilterSpec::with_base`] but including soft-deleted documents.
    pub fn with_base_all(base: Predicate) -> Self {
        Self {
            base: Some(base),
            include_deleted: true,
            ..Self::default()
        }
    }

    /// Lower the composed filter to a driver document.
    pub fn compose(&self) -> Document {
        let mut doc = match &self.base {
            Some(pred) => lower(pred),
            None => Document::new(),
        };

        if !self.include_deleted {
            doc.insert("deleted", false);
        }

        if let Some(range) = &self.date_range {
            if !range.is_empty() {
                let mut bounds = Document::new();
                if let Some(gte) = range.gte {
                    bounds.insert("$gte", gte);
                }
                if let Some(lt) = range.lt {
                    bounds.insert("$lt", lt);
                }
                doc.insert(range.field.clone(), bounds);
            }
        }

        if !self.criteria.is_empty() {
            let clauses: Vec<Bson> = self
                .criteria
                .iter()
                .map(|criterion| {
                    Bson::Document(doc! {
                        criterion.field.clone(): {
                            "$regex": escape_regex(&criterion.value),
                            "$options": "i",
                        }
                    })
                })
                .collect();
            // A base predicate may already have lowered to a top-level
            // `$or`; nest under `$and` rather than clobber it.
            match doc.remove("$or") {
                Some(existing) => {
                    doc.insert(
                        "$and",
                        vec![
                            Bson::Document(doc! { "$or": existing }),
                            Bson::Document(doc! { "$or": clauses }),
                        ],
                    );
                }
                None => {
                    doc.insert("$or", clauses);
                }
            }
        }

        doc
    }
}

/// Lower a predicate to a driver filter document.
pub fn lower(pred: &Predicate) -> Document {
    match pred {
        Predicate::Eq(field, value) => doc! { field: value.clone() },
        Predicate::Ne(field, value) => doc! { field: { "$ne": value.clone() } },
        Predicate::Range { field, gte, lt } => {
            let mut bounds = Document::new();
            if let Some(gte) = gte {
                bounds.insert("$gte", gte.clone());
            }
            if let Some(lt) = lt {
                bounds.insert("$lt", lt.clone());
            }
            doc! { field: bounds }
        }
        Predicate::Regex {
            field,
            pattern,
            case_insensitive,
        } => {
            if *case_insensitive {
                doc! { field: { "$regex": pattern.clone(), "$options": "i" } }
            } else {
                doc! { field: { "$regex": pattern.clone() } }
            }
        }
        Predicate::In(field, values) => doc! { field: { "$in": values.clone() } },
        Predicate::Exists(field, exists) => doc! { field: { "$exists": *exists } },
        Predicate::And(preds) => {
            let parts: Vec<Bson> = preds.iter().map(|p| Bson::Document(lower(p))).collect();
            doc! { "$and": parts }
        }
        Predicate::Or(preds) => {
            let parts: Vec<Bson> = preds.iter().map(|p| Bson::Document(lower(p))).collect();
            doc! { "$or": parts }
        }
    }
}

/// Build the free-text search `$match` stage: a case-insensitive substring
/// match OR-combined across the collection's searchable fields.
///
/// Returns `None` when the term is blank or no fields are declared.
pub fn search_stage(term: &str, fields: &[&str]) -> Option<Document> {
    let term = term.trim();
    if term.is_empty() || fields.is_empty() {
        return None;
    }
    let escaped = escape_regex(term);
    let clauses: Vec<Bson> = fields
        .iter()
        .map(|field| {
            Bson::Document(doc! { *field: { "$regex": escaped.clone(), "$options": "i" } })
        })
        .collect();
    Some(doc! { "$or": clauses })
}

/// Escape regex metacharacters so a search term matches as a literal
/// substring.
pub fn escape_regex(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(
            c,
            '.' | '*' | '+' | '?' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
                | '/'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_adds_not_deleted_guard() {
        let spec = FilterSpec::with_base(Predicate::eq("status", "PUBLISHED"));
        let doc = spec.compose();
        assert_eq!(doc.get_str("status").unwrap(), "PUBLISHED");
        assert_eq!(doc.get_bool("deleted").unwrap(), false);
    }

    #[test]
    fn compose_can_include_deleted() {
        let spec = FilterSpec {
            include_deleted: true,
            ..FilterSpec::default()
        };
        assert!(!spec.compose().contains_key("deleted"));
    }

    #[test]
    fn compose_normalizes_date_range() {
        let gte = DateTime::from_millis(0);
        let lt = DateTime::from_millis(86_400_000);
        let spec = FilterSpec {
            date_range: Some(DateRange::created(Some(gte), Some(lt))),
            ..FilterSpec::default()
        };
        let doc = spec.compose();
        let range = doc.get_document("createdAt").unwrap();
        assert_eq!(range.get_datetime("$gte").unwrap(), &gte);
        assert_eq!(range.get_datetime("$lt").unwrap(), &lt);
    }

    #[test]
    fn compose_lowers_criteria_as_ci_regex() {
        let spec = FilterSpec {
            criteria: vec![SearchCriterion::new("email", "a.b@example.com")],
            ..FilterSpec::default()
        };
        let doc = spec.compose();
        let clauses = doc.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 1);
        let regex = clauses[0]
            .as_document()
            .unwrap()
            .get_document("email")
            .unwrap();
        assert_eq!(regex.get_str("$regex").unwrap(), "a\\.b@example\\.com");
        assert_eq!(regex.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn compose_or_combines_criteria() {
        let spec = FilterSpec {
            criteria: vec![
                SearchCriterion::new("firstName", "ada"),
                SearchCriterion::new("email", "ada"),
            ],
            ..FilterSpec::default()
        };
        let doc = spec.compose();
        assert!(!doc.contains_key("firstName"));
        assert!(!doc.contains_key("email"));
        let clauses = doc.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 2);
        assert!(clauses[0].as_document().unwrap().contains_key("firstName"));
        assert!(clauses[1].as_document().unwrap().contains_key("email"));
        // The not-deleted guard still applies outside the disjunction.
        assert_eq!(doc.get_bool("deleted").unwrap(), false);
    }

    #[test]
    fn compose_keeps_base_or_separate_from_criteria() {
        let spec = FilterSpec {
            base: Some(Predicate::Or(vec![
                Predicate::eq("status", "DRAFT"),
                Predicate::eq("status", "ARCHIVED"),
            ])),
            criteria: vec![SearchCriterion::new("title", "rust")],
            ..FilterSpec::default()
        };
        let doc = spec.compose();
        assert!(!doc.contains_key("$or"));
        let and = doc.get_array("$and").unwrap();
        assert_eq!(and.len(), 2);
        for part in and {
            assert!(part.as_document().unwrap().contains_key("$or"));
        }
    }

    #[test]
    fn lower_nested_or() {
        let pred = Predicate::Or(vec![
            Predicate::eq("status", "DRAFT"),
            Predicate::eq("status", "ARCHIVED"),
        ]);
        let doc = lower(&pred);
        let parts = doc.get_array("$or").unwrap();
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn lower_range_only_emits_present_bounds() {
        let pred = Predicate::Range {
            field: "viewCount".into(),
            gte: Some(Bson::Int64(10)),
            lt: None,
        };
        let doc = lower(&pred);
        let bounds = doc.get_document("viewCount").unwrap();
        assert!(bounds.contains_key("$gte"));
        assert!(!bounds.contains_key("$lt"));
    }

    #[test]
    fn search_stage_ors_over_fields() {
        let stage = search_stage("rust", &["content", "slug", "tags"]).unwrap();
        let clauses = stage.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 3);
    }

    #[test]
    fn search_stage_empty_term_is_none() {
        assert!(search_stage("   ", &["content"]).is_none());
        assert!(search_stage("rust", &[]).is_none());
    }
}
