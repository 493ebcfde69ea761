//! # capitol-rest - Queryable and Searchable HTTP API
//!
//! This crate serves the query API over any [`ResultExecutor`]. Each
//! request is translated by `capitol-query` into a validated query, then
//! either executed or returned as-is in explain mode.
//!
//! ## Features
//!
//! - **Queryable path**: Filter, sort and paginate a collection with plain
//!   query parameters (`chamber=house`, `introduced_on__gte=2013-01-01`)
//! - **Searchable path**: Phrase (`query`) and query string (`q`) searches
//!   with relevance scores and optional highlighting
//! - **Explain mode**: `explain=true` returns the assembled query without
//!   touching the backend
//! - **Formats**: JSON, JSONP (`callback`) and XML
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use capitol_query::ModelRegistry;
//! use capitol_query::backends::MemoryExecutor;
//! use capitol_rest::{create_app, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = Arc::new(ModelRegistry::builtin());
//!     let executor = MemoryExecutor::from_json_str(r#"{"bills": []}"#)?;
//!
//!     let app = create_app(registry, executor);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | query | GET | `/[collection].[json\|xml]?filters` |
//! | search | GET | `/[collection]/search.[json\|xml]?query=...` or `?q=...` |
//! | health | GET | `/health`, `/_liveness`, `/_readiness` |
//!
//! ## Error Handling
//!
//! Errors are returned as `{"error": message, "status": code}` in the
//! requested format with HTTP 200, so JSONP and legacy clients can read
//! them. Unknown collections (404) and unsupported formats (415) also set
//! the transport status. See [`error`] for the full mapping.
//!
//! ## Architecture
//!
//! - [`error`] - Error types and the error envelope
//! - [`config`] - Server configuration
//! - [`state`] - Application state (registry, executor, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`reload`] - Descriptor file hot reload
//! - [`extractors`] - Query string and route segment extractors
//! - [`responses`] - JSON, JSONP and XML rendering
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod reload;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use reload::{DescriptorWatcher, ReloadOutcome};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use capitol_query::{ModelRegistry, ResultExecutor};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
///
/// # Arguments
///
/// * `registry` - The model registry, shared so it can be reloaded in place
/// * `executor` - The result executor to use
pub fn create_app<E>(registry: Arc<ModelRegistry>, executor: E) -> Router
where
    E: ResultExecutor + 'static,
{
    create_app_with_config(registry, executor, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use capitol_query::ModelRegistry;
/// use capitol_query::backends::MemoryExecutor;
/// use capitol_rest::{create_app_with_config, ServerConfig};
///
/// let config = ServerConfig {
///     port: 3000,
///     max_page_size: 100,
///     ..Default::default()
/// };
/// let app = create_app_with_config(
///     Arc::new(ModelRegistry::builtin()),
///     MemoryExecutor::new(),
///     config,
/// );
/// ```
pub fn create_app_with_config<E>(
    registry: Arc<ModelRegistry>,
    executor: E,
    config: ServerConfig,
) -> Router
where
    E: ResultExecutor + 'static,
{
    info!(
        backend = executor.backend_name(),
        models = registry.len(),
        "Creating query API server"
    );

    let state = AppState::new(registry, Arc::new(executor), config.clone());

    let router = routing::api_routes::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = split_list(&config.cors_origins)
            .filter_map(|s| s.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = split_list(&config.cors_methods)
            .filter_map(|s| s.parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = split_list(&config.cors_headers)
            .filter_map(|s| s.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "capitol_rest={level},capitol_query={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
