//! HTTP request handlers for the query API.
//!
//! - [`queryable`] - Filter, sort and paginate a collection
//! - [`searchable`] - Full-text search over a collection
//! - [`health`] - Health check endpoints
//!
//! Both data handlers share one shape: parse the route, build the renderer,
//! look up the model, assemble the query, then either explain it or run it
//! under the backend deadline. Every failure is rendered as an error
//! envelope in the requested format.

pub mod health;
pub mod queryable;
pub mod searchable;

use axum::http::Uri;
use axum::response::Response;
use capitol_query::executor::{effective_timeout, run_with_timeout};
use capitol_query::{ExecutorError, ResultSet};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::{RestError, RestResult};
use crate::extractors::fallback_format;
use crate::responses::Renderer;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use queryable::queryable_handler;
pub use searchable::searchable_handler;

/// Handler for paths that match no route.
///
/// Responds with a 404 error envelope, in XML when the path ends in `.xml`.
pub async fn not_found_handler(uri: Uri) -> Response {
    let path = uri.path();
    let renderer = Renderer::new(fallback_format(path), "");
    reject(
        &renderer,
        path,
        RestError::NotFound {
            path: path.to_string(),
        },
    )
}

/// Renders an error envelope and logs it.
///
/// Caller mistakes are logged at debug level; backend and server failures
/// at warn.
fn reject(renderer: &Renderer, path: &str, err: RestError) -> Response {
    let format = renderer.format().extension();
    if err.is_client_error() {
        debug!(
            path = %path,
            format,
            status = err.envelope_status(),
            error = %err,
            "Request rejected"
        );
    } else {
        warn!(
            path = %path,
            format,
            status = err.envelope_status(),
            error = %err,
            "Request failed"
        );
    }
    renderer.render_error(&err)
}

/// Runs one executor call under the configured deadline.
///
/// The request's `timeout` parameter may shorten the deadline.
async fn execute_within<F>(
    config: &ServerConfig,
    requested_ms: Option<u64>,
    call: F,
) -> RestResult<ResultSet>
where
    F: Future<Output = Result<ResultSet, ExecutorError>>,
{
    let timeout = effective_timeout(config.backend_timeout(), requested_ms);
    run_with_timeout(call, timeout)
        .await
        .map_err(|err| RestError::Query(err.into()))
}
