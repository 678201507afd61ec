//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_LIMIT: u64 = 20;
/// Maximum page size.
const MAX_LIMIT: u64 = 100;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order (the default).
    #[default]
    Desc,
}

impl SortOrder {
    /// The sort direction as the integer the storage layer expects.
    pub fn as_int(self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageQuery {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Free-text search term applied over the searchable fields.
    #[serde(default)]
    pub search_key: Option<String>,
    /// Requested sort field (checked against a per-collection allow-list).
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl PageQuery {
    /// Create a new page query with clamped bounds.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
            search_key: None,
            sort_by: None,
            sort_order: SortOrder::Desc,
        }
    }

    /// Number of documents to skip for this page.
    pub fn skip(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.limit
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            search_key: None,
            sort_by: None,
            sort_order: SortOrder::Desc,
        }
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages (0 when there are no items).
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_prev: bool,
}

impl PageMeta {
    /// Compute pagination metadata from the page, limit, and total count.
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if total == 0 || limit == 0 {
            0
        } else {
            total.div_ceil(limit)
        };
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

impl<T> Paginated<T> {
    /// Create a paginated response from a page of items and a total count.
    pub fn new(data: Vec<T>, query: &PageQuery, total: u64) -> Self {
        Self {
            data,
            pagination: PageMeta::new(query.page, query.limit, total),
        }
    }

    /// Create an empty response.
    pub fn empty(query: &PageQuery) -> Self {
        Self {
            data: Vec::new(),
            pagination: PageMeta::new(query.page, query.limit, 0),
        }
    }

    /// Map the items of this page, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_is_zero_based() {
        assert_eq!(PageQuery::new(1, 20).skip(), 0);
        assert_eq!(PageQuery::new(3, 10).skip(), 20);
    }

    #[test]
    fn new_clamps_bounds() {
        let q = PageQuery::new(0, 500);
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 100);
    }

    #[test]
    fn meta_rounds_pages_up() {
        let meta = PageMeta::new(2, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn meta_for_empty_result() {
        let meta = PageMeta::new(1, 20, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn meta_on_last_page() {
        let meta = PageMeta::new(3, 10, 25);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn meta_serializes_camel_case() {
        let meta = PageMeta::new(1, 20, 5);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["hasNext"], false);
        assert_eq!(json["hasPrev"], false);
    }
}
