//! Application state for the query API.
//!
//! Handlers share the model registry, the result executor and the server
//! configuration.

use std::sync::Arc;

use capitol_query::builder::PageLimits;
use capitol_query::{ModelRegistry, ResultExecutor};

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `E` - The result executor (must implement [`ResultExecutor`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use capitol_query::{ModelRegistry, ResultExecutor};
/// use capitol_query::backends::MemoryExecutor;
/// use capitol_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(
///     Arc::new(ModelRegistry::builtin()),
///     Arc::new(MemoryExecutor::new()),
///     ServerConfig::default(),
/// );
/// assert_eq!(state.executor().backend_name(), "memory");
/// ```
pub struct AppState<E> {
    /// Model descriptor registry.
    registry: Arc<ModelRegistry>,

    /// The result executor.
    executor: Arc<E>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since E is wrapped in Arc and doesn't need to be Clone
impl<E> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            executor: Arc::clone(&self.executor),
            config: Arc::clone(&self.config),
        }
    }
}

impl<E: ResultExecutor> AppState<E> {
    /// Creates a new AppState.
    pub fn new(registry: Arc<ModelRegistry>, executor: Arc<E>, config: ServerConfig) -> Self {
        Self {
            registry,
            executor,
            config: Arc::new(config),
        }
    }

    /// Returns the model registry.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Returns the result executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the page size limits.
    pub fn page_limits(&self) -> PageLimits {
        self.config.page_limits()
    }
}

#[cfg(test)]
mod tests {
    use capitol_query::backends::MemoryExecutor;

    use super::*;

    fn state() -> AppState<MemoryExecutor> {
        let config = ServerConfig {
            default_page_size: 10,
            max_page_size: 25,
            ..Default::default()
        };
        AppState::new(
            Arc::new(ModelRegistry::builtin()),
            Arc::new(MemoryExecutor::new()),
            config,
        )
    }

    #[test]
    fn test_app_state_access() {
        let state = state();
        assert!(state.registry().lookup("bills").is_ok());
        assert_eq!(state.page_limits(), PageLimits::new(10, 25));
        assert_eq!(state.config().max_page_size, 25);
    }

    #[test]
    fn test_app_state_clone_shares_registry() {
        let state = state();
        let cloned = state.clone();
        assert!(std::ptr::eq(state.registry(), cloned.registry()));
    }
}
