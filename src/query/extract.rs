//! Axum extractor for query parameters
//!
//! Lets handlers receive permissive-mode [`QueryParams`] directly:
//!
//! ```rust,ignore
//! async fn list_categories(params: QueryParams) -> ... { ... }
//! ```
//!
//! Policy-enforced resolution needs a config, which extractors cannot
//! carry; handlers that enforce an allow-list should keep their
//! [`QueryBuilderConfig`](crate::query::config::QueryBuilderConfig) in state
//! and call [`QueryParams::from_query`] themselves.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::core::error::CrudKitError;
use crate::query::params::QueryParams;

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = CrudKitError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        QueryParams::from_query(query, None).map_err(CrudKitError::from)
    }
}
