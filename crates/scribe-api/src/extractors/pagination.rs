//! Pagination query parameter extractor.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use scribe_core::error::AppError;
use scribe_core::types::PageQuery;

use crate::error::ApiError;
use crate::state::AppState;

/// Clamped pagination parameters for list endpoints.
///
/// Accepts `page`, `limit`, `search_key`, `sort_by`, and `sort_order`
/// as query parameters; out-of-range values are clamped rather than
/// rejected.
#[derive(Debug, Clone)]
pub struct Pagination(pub PageQuery);

impl FromRequestParts<AppState> for Pagination {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(raw): Query<PageQuery> = Query::try_from_uri(&parts.uri)
            .map_err(|e| AppError::validation(format!("Invalid pagination parameters: {e}")))?;

        let mut query = PageQuery::new(raw.page, raw.limit);
        query.search_key = raw.search_key.filter(|s| !s.trim().is_empty());
        query.sort_by = raw.sort_by;
        query.sort_order = raw.sort_order;

        Ok(Pagination(query))
    }
}
