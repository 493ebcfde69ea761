//! Capitol query API server.
//!
//! Serves the queryable and searchable paths over the in-memory backend.

use std::sync::Arc;

use capitol_query::ModelRegistry;
use capitol_query::backends::MemoryExecutor;
use capitol_rest::{DescriptorWatcher, ServerConfig, create_app_with_config, init_logging};
use clap::Parser;
use tracing::{info, warn};

/// Loads the model registry from the configured file or the built-in models.
fn load_registry(config: &ServerConfig) -> anyhow::Result<ModelRegistry> {
    match &config.models_file {
        Some(path) => {
            info!(path = %path.display(), "Loading model descriptors");
            Ok(ModelRegistry::from_file(path)?)
        }
        None => {
            info!("Using built-in model descriptors");
            Ok(ModelRegistry::builtin())
        }
    }
}

/// Creates the in-memory backend, loading records from the data file if set.
async fn create_memory_backend(config: &ServerConfig) -> anyhow::Result<MemoryExecutor> {
    let executor = MemoryExecutor::new();
    if let Some(path) = &config.data_file {
        let json = tokio::fs::read_to_string(path).await?;
        let records = executor.load_json_str(&json)?;
        info!(path = %path.display(), records, "Loaded records into memory backend");
    } else {
        warn!("No data file configured; every collection is empty");
    }
    Ok(executor)
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        max_page_size = config.max_page_size,
        backend_timeout_ms = config.backend_timeout_ms,
        "Starting Capitol query API"
    );

    let registry = Arc::new(load_registry(&config)?);
    let executor = create_memory_backend(&config).await?;

    if let (Some(every), Some(path)) = (config.reload_every(), config.models_file.clone()) {
        DescriptorWatcher::new(Arc::clone(&registry), path)
            .await
            .spawn(every);
    }

    let app = create_app_with_config(registry, executor, config.clone());
    serve(app, &config).await
}
