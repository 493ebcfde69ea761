//! Health check endpoint handlers.
//!
//! Provides health check endpoints for monitoring and load balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use capitol_query::ResultExecutor;
use tracing::debug;

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Server is healthy
pub async fn health_handler<E>(State(state): State<AppState<E>>) -> Response
where
    E: ResultExecutor,
{
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": state.executor().backend_name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(health_response)).into_response()
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe.
///
/// Ready once at least one model is registered.
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
///
/// # Response
///
/// - `200 OK` - Models are registered
/// - `503 Service Unavailable` - The registry is empty
pub async fn readiness_handler<E>(State(state): State<AppState<E>>) -> Response
where
    E: ResultExecutor,
{
    debug!("Processing readiness check request");

    let models = state.registry().len();
    let (status, label) = if models > 0 {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    let response = serde_json::json!({
        "status": label,
        "backend": state.executor().backend_name(),
        "checks": {
            "models": models
        }
    });

    (status, Json(response)).into_response()
}
