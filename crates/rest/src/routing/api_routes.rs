//! API route configuration.

use axum::{Router, routing::get};
use capitol_query::ResultExecutor;

use crate::handlers;
use crate::state::AppState;

/// Creates all query API routes.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## Collection-level
/// - `GET /{collection}.{format}` - Queryable path
/// - `GET /{collection}/search.{format}` - Searchable path
///
/// Anything else gets a 404 error envelope.
pub fn create_routes<E>(state: AppState<E>) -> Router
where
    E: ResultExecutor + 'static,
{
    Router::new()
        // System-level routes
        .route("/health", get(handlers::health_handler::<E>))
        .route("/_liveness", get(handlers::health::liveness_handler))
        .route("/_readiness", get(handlers::health::readiness_handler::<E>))
        // Collection-level routes
        .route("/{resource}", get(handlers::queryable_handler::<E>))
        .route(
            "/{collection}/{action}",
            get(handlers::searchable_handler::<E>),
        )
        .fallback(handlers::not_found_handler)
        .with_state(state)
}
