//! Query string extractor.

use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};
use capitol_query::types::RequestParameters;

/// Axum extractor for the raw request parameters.
///
/// Keeps repeated keys, so `?chamber=house&chamber=senate` yields both
/// values in arrival order.
///
/// # Example
///
/// ```rust,ignore
/// use capitol_rest::extractors::QueryParams;
///
/// async fn handler(QueryParams(params): QueryParams) {
///     let fields = params.list("fields");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryParams(pub RequestParameters);

impl QueryParams {
    /// Returns the collected parameters.
    pub fn into_inner(self) -> RequestParameters {
        self.0
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid query parameters"))?;

        Ok(QueryParams(RequestParameters::from_pairs(pairs)))
    }
}
