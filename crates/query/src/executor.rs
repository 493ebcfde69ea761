//! Result executor boundary.
//!
//! The translation core never talks to a database or search index itself.
//! It hands an assembled [`StructuredQuery`] or [`SearchQuery`] to a
//! [`ResultExecutor`], which also declares what it can do through
//! [`BackendCapabilities`]: the filter operators it accepts and the extra
//! search options it understands.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ExecutorError, ExecutorResult};
use crate::types::{Operator, Pagination, SearchQuery, StructuredQuery};

/// Value kind of a backend search option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// `true` or `false`.
    Boolean,
    /// A non-negative integer.
    Integer,
    /// Any string.
    String,
}

/// A backend-declared search option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptionSpec {
    /// The request parameter name (e.g. `highlight.size`).
    pub name: String,
    /// The value kind used for coercion.
    pub kind: OptionKind,
}

/// What a backend supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendCapabilities {
    /// Filter operators the backend can evaluate.
    pub operators: Vec<Operator>,
    /// Extra search options the backend understands.
    pub search_options: Vec<SearchOptionSpec>,
}

impl BackendCapabilities {
    /// Creates capabilities with the given operators and no search options.
    pub fn new(operators: impl IntoIterator<Item = Operator>) -> Self {
        Self {
            operators: operators.into_iter().collect(),
            search_options: Vec::new(),
        }
    }

    /// Capabilities covering every known operator.
    pub fn all_operators() -> Self {
        Self::new(Operator::ALL)
    }

    /// Declares a search option.
    pub fn with_search_option(mut self, name: impl Into<String>, kind: OptionKind) -> Self {
        self.search_options.push(SearchOptionSpec {
            name: name.into(),
            kind,
        });
        self
    }

    /// Returns true if the backend accepts the operator.
    pub fn supports(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }

    /// Returns the declared search option with this name.
    pub fn search_option(&self, name: &str) -> Option<&SearchOptionSpec> {
        self.search_options.iter().find(|o| o.name == name)
    }
}

impl Default for BackendCapabilities {
    fn default() -> Self {
        Self::all_operators()
    }
}

/// Page metadata attached to every result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Number of records on this page.
    pub count: usize,
    /// Requested page size.
    pub per_page: u64,
    /// 1-based page number.
    pub page: u64,
}

/// Records returned by an executor.
///
/// Search results carry a `search` object inside each record with the
/// relevance `score` and the `matched_fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// The records on this page, projected to the requested fields.
    pub results: Vec<Map<String, Value>>,
    /// Total number of matching records.
    pub count: u64,
    /// Page metadata.
    pub page: PageInfo,
}

impl ResultSet {
    /// Creates a result set for one page of records.
    pub fn new(results: Vec<Map<String, Value>>, count: u64, pagination: &Pagination) -> Self {
        let page = PageInfo {
            count: results.len(),
            per_page: pagination.per_page,
            page: pagination.page,
        };
        Self {
            results,
            count,
            page,
        }
    }

    /// Creates an empty, well-formed result set.
    pub fn empty(pagination: &Pagination) -> Self {
        Self::new(Vec::new(), 0, pagination)
    }

    /// Returns true if there are no records on this page.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Executes assembled queries against a backing store or search index.
#[async_trait]
pub trait ResultExecutor: Send + Sync {
    /// Returns a short name for logging.
    fn backend_name(&self) -> &'static str;

    /// Returns what this backend supports.
    fn capabilities(&self) -> &BackendCapabilities;

    /// Executes a queryable-path query.
    ///
    /// # Errors
    ///
    /// * `ExecutorError::Unavailable` - If the backend cannot be reached
    /// * `ExecutorError::Internal` - If the backend fails
    async fn execute(&self, query: &StructuredQuery) -> ExecutorResult<ResultSet>;

    /// Executes a searchable-path query.
    async fn search(&self, query: &SearchQuery) -> ExecutorResult<ResultSet>;
}

/// Runs an executor future with a deadline.
///
/// Elapse maps to [`ExecutorError::Timeout`]; the future is dropped.
pub async fn run_with_timeout<F, T>(future: F, timeout: Duration) -> ExecutorResult<T>
where
    F: Future<Output = ExecutorResult<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(ExecutorError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Picks the timeout for one call.
///
/// A caller may shorten the deployment default but never extend it. Zero is
/// ignored.
pub fn effective_timeout(default: Duration, requested_ms: Option<u64>) -> Duration {
    match requested_ms {
        Some(ms) if ms > 0 => default.min(Duration::from_millis(ms)),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination() -> Pagination {
        Pagination {
            page: 2,
            per_page: 10,
            offset: 10,
            limit: 10,
        }
    }

    #[test]
    fn test_capabilities() {
        let caps = BackendCapabilities::new([Operator::Eq, Operator::In])
            .with_search_option("highlight", OptionKind::Boolean);

        assert!(caps.supports(Operator::Eq));
        assert!(!caps.supports(Operator::Gt));
        assert_eq!(
            caps.search_option("highlight").map(|o| o.kind),
            Some(OptionKind::Boolean)
        );
        assert!(caps.search_option("boost").is_none());
        assert!(BackendCapabilities::default().supports(Operator::Match));
    }

    #[test]
    fn test_empty_result_set() {
        let results = ResultSet::empty(&pagination());
        assert!(results.is_empty());
        assert_eq!(results.count, 0);
        assert_eq!(
            results.page,
            PageInfo {
                count: 0,
                per_page: 10,
                page: 2
            }
        );
    }

    #[test]
    fn test_effective_timeout() {
        let default = Duration::from_millis(5000);
        assert_eq!(effective_timeout(default, None), default);
        assert_eq!(effective_timeout(default, Some(0)), default);
        assert_eq!(
            effective_timeout(default, Some(200)),
            Duration::from_millis(200)
        );
        assert_eq!(effective_timeout(default, Some(60_000)), default);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_with_timeout_elapses() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, ExecutorError>(1)
        };
        let result = run_with_timeout(slow, Duration::from_millis(100)).await;
        assert_eq!(result, Err(ExecutorError::Timeout { timeout_ms: 100 }));
    }

    #[tokio::test]
    async fn test_run_with_timeout_passes_through() {
        let fast = async { Ok::<_, ExecutorError>(7) };
        assert_eq!(
            run_with_timeout(fast, Duration::from_secs(1)).await,
            Ok(7)
        );
    }
}
