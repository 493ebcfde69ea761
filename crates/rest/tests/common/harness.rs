//! Query API test harness.
//!
//! Builds test servers over the in-memory backend or a stub executor.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use capitol_query::backends::MemoryExecutor;
use capitol_query::error::ExecutorResult;
use capitol_query::{
    BackendCapabilities, ExecutorError, ExplainPlan, ModelRegistry, ResultExecutor, ResultSet,
    SearchQuery, StructuredQuery,
};

use capitol_rest::{ServerConfig, create_app_with_config};

use super::fixtures;

/// Returns the in-memory backend loaded with the fixtures.
pub fn memory_executor() -> MemoryExecutor {
    MemoryExecutor::new()
        .with_records("bills", fixtures::bills())
        .with_records("votes", fixtures::votes())
}

/// Creates a test server over the given executor and configuration.
pub fn server_with<E>(executor: E, config: ServerConfig) -> TestServer
where
    E: ResultExecutor + 'static,
{
    server_over(Arc::new(ModelRegistry::builtin()), executor, config)
}

/// Creates a test server over a shared registry.
pub fn server_over<E>(registry: Arc<ModelRegistry>, executor: E, config: ServerConfig) -> TestServer
where
    E: ResultExecutor + 'static,
{
    let app = create_app_with_config(registry, executor, config);
    TestServer::new(app).expect("Failed to create test server")
}

/// Creates a test server over the fixture-loaded in-memory backend.
pub fn memory_server() -> TestServer {
    server_with(memory_executor(), ServerConfig::for_testing())
}

/// An executor that counts calls, records the queries it receives and
/// returns a canned outcome.
pub struct StubExecutor {
    calls: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<ExplainPlan>>>,
    failure: Option<ExecutorError>,
    capabilities: BackendCapabilities,
}

impl StubExecutor {
    /// Creates a stub that returns empty result sets.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            capabilities: BackendCapabilities::all_operators(),
        }
    }

    /// Makes every call fail with `error`.
    pub fn failing(error: ExecutorError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    /// Returns a handle to the call counter.
    pub fn counter(&self) -> CallCounter {
        CallCounter(Arc::clone(&self.calls))
    }

    /// Returns a handle to the queries received so far.
    pub fn recorder(&self) -> QueryRecorder {
        QueryRecorder(Arc::clone(&self.received))
    }

    fn record_call(&self, plan: ExplainPlan) -> ExecutorResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(plan);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResultExecutor for StubExecutor {
    fn backend_name(&self) -> &'static str {
        "stub"
    }

    fn capabilities(&self) -> &BackendCapabilities {
        &self.capabilities
    }

    async fn execute(&self, query: &StructuredQuery) -> ExecutorResult<ResultSet> {
        self.record_call(query.clone().into())?;
        Ok(ResultSet::empty(&query.pagination))
    }

    async fn search(&self, query: &SearchQuery) -> ExecutorResult<ResultSet> {
        self.record_call(query.clone().into())?;
        Ok(ResultSet::empty(&query.pagination))
    }
}

/// Shared view of a stub's call count.
#[derive(Clone)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Returns the number of executor calls so far.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Shared view of the queries a stub received, as plans.
#[derive(Clone)]
pub struct QueryRecorder(Arc<Mutex<Vec<ExplainPlan>>>);

impl QueryRecorder {
    /// Returns the most recently received query.
    pub fn last(&self) -> Option<ExplainPlan> {
        self.0.lock().unwrap().last().cloned()
    }
}

/// Configuration with a short backend deadline.
pub fn short_deadline(ms: u64) -> ServerConfig {
    ServerConfig {
        backend_timeout_ms: ms,
        ..ServerConfig::for_testing()
    }
}

/// A slow in-memory backend.
pub fn slow_executor(latency: Duration) -> MemoryExecutor {
    memory_executor().with_latency(latency)
}
