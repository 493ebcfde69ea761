//! Server configuration for the query API.
//!
//! Supports command line arguments with environment variable fallbacks, and
//! programmatic construction.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CAPITOL_SERVER_PORT` | 8080 | Server port |
//! | `CAPITOL_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `CAPITOL_LOG_LEVEL` | info | Log level |
//! | `CAPITOL_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `CAPITOL_ENABLE_CORS` | true | Enable CORS |
//! | `CAPITOL_CORS_ORIGINS` | * | Allowed origins |
//! | `CAPITOL_CORS_METHODS` | GET,OPTIONS | Allowed methods |
//! | `CAPITOL_CORS_HEADERS` | Content-Type,Accept | Allowed headers |
//! | `CAPITOL_DEFAULT_PAGE_SIZE` | 20 | Page size when `per_page` is absent |
//! | `CAPITOL_MAX_PAGE_SIZE` | 50 | Largest accepted `per_page` |
//! | `CAPITOL_BACKEND_TIMEOUT_MS` | 5000 | Executor call timeout (milliseconds) |
//! | `CAPITOL_MODELS_FILE` | (built-in models) | JSON model descriptor file |
//! | `CAPITOL_DATA_FILE` | (none) | JSON records for the in-memory backend |
//! | `CAPITOL_RELOAD_INTERVAL` | 0 | Descriptor file poll interval (seconds, 0 = off) |
//!
//! # Example
//!
//! ```rust
//! use capitol_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     max_page_size: 100,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;
use std::time::Duration;

use capitol_query::builder::PageLimits;
use clap::Parser;

/// Server configuration for the query API.
#[derive(Debug, Clone, Parser)]
#[command(name = "capitol")]
#[command(about = "Queryable and searchable HTTP API over registered data models")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "CAPITOL_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "CAPITOL_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CAPITOL_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "CAPITOL_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "CAPITOL_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "CAPITOL_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "CAPITOL_CORS_METHODS", default_value = "GET,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "CAPITOL_CORS_HEADERS", default_value = "Content-Type,Accept")]
    pub cors_headers: String,

    /// Page size used when a request gives no `per_page`.
    #[arg(long, env = "CAPITOL_DEFAULT_PAGE_SIZE", default_value = "20")]
    pub default_page_size: u64,

    /// Largest page size a request may ask for. Larger requests are clamped.
    #[arg(long, env = "CAPITOL_MAX_PAGE_SIZE", default_value = "50")]
    pub max_page_size: u64,

    /// Deadline for one executor call, in milliseconds. A request's
    /// `timeout` parameter may shorten it but never extend it.
    #[arg(long, env = "CAPITOL_BACKEND_TIMEOUT_MS", default_value = "5000")]
    pub backend_timeout_ms: u64,

    /// JSON model descriptor file. The built-in models are used without one.
    #[arg(long, env = "CAPITOL_MODELS_FILE")]
    pub models_file: Option<PathBuf>,

    /// JSON records for the in-memory backend, keyed by collection.
    #[arg(long, env = "CAPITOL_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Seconds between checks of the models file for changes (0 disables).
    #[arg(long, env = "CAPITOL_RELOAD_INTERVAL", default_value = "0")]
    pub reload_interval: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept".to_string(),
            default_page_size: 20,
            max_page_size: 50,
            backend_timeout_ms: 5000,
            models_file: None,
            data_file: None,
            reload_interval: 0,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the page size limits for the translation core.
    pub fn page_limits(&self) -> PageLimits {
        PageLimits::new(self.default_page_size, self.max_page_size)
    }

    /// Returns the executor call deadline.
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout_ms)
    }

    /// Returns the descriptor poll interval, if hot reload is enabled.
    pub fn reload_every(&self) -> Option<Duration> {
        (self.reload_interval > 0 && self.models_file.is_some())
            .then(|| Duration::from_secs(self.reload_interval))
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if self.backend_timeout_ms == 0 {
            errors.push("Backend timeout cannot be 0".to_string());
        }

        if self.reload_interval > 0 && self.models_file.is_none() {
            errors.push("Reload interval requires a models file".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses ephemeral port 0, disables CORS and shortens timeouts.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            default_page_size: 20,
            max_page_size: 50,
            backend_timeout_ms: 1000,
            models_file: None,
            data_file: None,
            reload_interval: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.enable_cors);
        assert_eq!(config.page_limits(), PageLimits::new(20, 50));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = ServerConfig {
            port: 0,
            backend_timeout_ms: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("Port")));
        assert!(errors.iter().any(|e| e.contains("Backend timeout")));
    }

    #[test]
    fn test_validate_invalid_page_sizes() {
        let config = ServerConfig {
            default_page_size: 100,
            max_page_size: 50,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reload_requires_models_file() {
        let mut config = ServerConfig {
            reload_interval: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.reload_every(), None);

        config.models_file = Some(PathBuf::from("models.json"));
        assert!(config.validate().is_ok());
        assert_eq!(config.reload_every(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_parse_from_args() {
        let config = ServerConfig::try_parse_from([
            "capitol",
            "--port",
            "9000",
            "--max-page-size",
            "100",
            "--backend-timeout-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.backend_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
    }
}
