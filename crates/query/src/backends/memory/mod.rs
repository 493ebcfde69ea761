//! In-memory reference executor.
//!
//! Holds JSON records per collection and evaluates structured and search
//! queries in process. Used by the server when it is pointed at a JSON data
//! file, and by tests.
//!
//! # Example
//!
//! ```
//! use capitol_query::backends::MemoryExecutor;
//!
//! let executor = MemoryExecutor::from_json_str(
//!     r#"{"bills": [{"bill_id": "hr1-113", "title": "Farm Bill"}]}"#,
//! )
//! .unwrap();
//! assert_eq!(executor.record_count("bills"), 1);
//! ```

mod eval;
mod text;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::ExecutorResult;
use crate::executor::{BackendCapabilities, OptionKind, ResultExecutor, ResultSet};
use crate::types::{Pagination, SearchQuery, StructuredQuery};

use self::eval::{compare_records, lookup, matches_all, project};
use self::text::{FieldText, TextQuery, highlight};

type Record = Map<String, Value>;

const DEFAULT_HIGHLIGHT_TAGS: (&str, &str) = ("<em>", "</em>");
const DEFAULT_HIGHLIGHT_SIZE: usize = 200;

/// Executor over records held in memory.
pub struct MemoryExecutor {
    collections: RwLock<HashMap<String, Arc<Vec<Record>>>>,
    capabilities: BackendCapabilities,
    latency: Option<Duration>,
}

impl MemoryExecutor {
    /// Creates an empty executor.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            capabilities: Self::default_capabilities(),
            latency: None,
        }
    }

    /// Every operator, plus the `highlight`, `highlight.tags` and
    /// `highlight.size` search options.
    pub fn default_capabilities() -> BackendCapabilities {
        BackendCapabilities::all_operators()
            .with_search_option("highlight", OptionKind::Boolean)
            .with_search_option("highlight.tags", OptionKind::String)
            .with_search_option("highlight.size", OptionKind::Integer)
    }

    /// Creates an executor from a JSON document keyed by collection.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let executor = Self::new();
        executor.load_json_str(json)?;
        Ok(executor)
    }

    /// Replaces the declared capabilities.
    pub fn with_capabilities(mut self, capabilities: BackendCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Delays every call, for exercising timeouts.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Adds or replaces one collection.
    ///
    /// Values that are not JSON objects are skipped.
    pub fn with_records(self, collection: impl Into<String>, records: Vec<Value>) -> Self {
        let records = records
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.collections
            .write()
            .insert(collection.into(), Arc::new(records));
        self
    }

    /// Replaces all data from a JSON document keyed by collection.
    ///
    /// Returns the total number of records loaded.
    pub fn load_json_str(&self, json: &str) -> Result<usize, serde_json::Error> {
        let data: HashMap<String, Vec<Record>> = serde_json::from_str(json)?;
        let total = data.values().map(Vec::len).sum();
        let table = data
            .into_iter()
            .map(|(name, records)| (name, Arc::new(records)))
            .collect();
        *self.collections.write() = table;
        Ok(total)
    }

    /// Returns the number of records in a collection.
    pub fn record_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, |records| records.len())
    }

    fn records(&self, collection: &str) -> Arc<Vec<Record>> {
        self.collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for MemoryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("MemoryExecutor")
            .field("collections", &names)
            .field("latency", &self.latency)
            .finish()
    }
}

#[async_trait]
impl ResultExecutor for MemoryExecutor {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn capabilities(&self) -> &BackendCapabilities {
        &self.capabilities
    }

    async fn execute(&self, query: &StructuredQuery) -> ExecutorResult<ResultSet> {
        self.simulate_latency().await;

        let records = self.records(&query.model);
        let mut hits: Vec<&Record> = records
            .iter()
            .filter(|r| matches_all(r, &query.conditions))
            .collect();
        if !query.order.is_empty() {
            hits.sort_by(|a, b| compare_records(a, b, &query.order));
        }

        let count = hits.len() as u64;
        let results = page(hits, &query.pagination)
            .map(|r| project(r, &query.fields))
            .collect();

        debug!(model = %query.model, count, "Executed structured query");
        Ok(ResultSet::new(results, count, &query.pagination))
    }

    async fn search(&self, query: &SearchQuery) -> ExecutorResult<ResultSet> {
        self.simulate_latency().await;

        let text_query = TextQuery::compile(&query.term);
        let records = self.records(&query.model);

        let mut hits: Vec<(&Record, text::TextMatch, Vec<FieldText>)> = records
            .iter()
            .filter(|r| matches_all(r, &query.filter))
            .filter_map(|r| {
                let fields = searched_text(r, query);
                text_query.evaluate(&fields).map(|m| (r, m, fields))
            })
            .collect();

        if query.order.is_empty() {
            hits.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));
        } else {
            hits.sort_by(|a, b| compare_records(a.0, b.0, &query.order));
        }

        let highlighter = Highlighter::from_options(&query.options);
        let count = hits.len() as u64;
        let results = page(hits, &query.pagination)
            .map(|(record, matched, fields)| {
                let mut out = project(record, &query.fields);
                let mut meta = json!({
                    "score": matched.score,
                    "matched_fields": matched.matched_fields,
                });
                if let Some(h) = &highlighter {
                    meta["highlight"] = h.render(&matched, &fields);
                }
                out.insert("search".to_string(), meta);
                out
            })
            .collect();

        debug!(model = %query.model, count, "Executed search query");
        Ok(ResultSet::new(results, count, &query.pagination))
    }
}

fn page<T>(items: Vec<T>, pagination: &Pagination) -> impl Iterator<Item = T> {
    let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit)
}

/// Collects the text of each searched field. Arrays of strings are joined
/// with spaces; numbers are rendered as text.
fn searched_text(record: &Record, query: &SearchQuery) -> Vec<FieldText> {
    query
        .search_fields
        .iter()
        .filter_map(|spec| {
            let text = match lookup(record, &spec.field)? {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => return None,
            };
            Some(FieldText {
                field: spec.field.clone(),
                weight: f64::from(spec.weight.unwrap_or(1.0)),
                text,
            })
        })
        .collect()
}

struct Highlighter {
    open: String,
    close: String,
    size: usize,
}

impl Highlighter {
    fn from_options(options: &std::collections::BTreeMap<String, Value>) -> Option<Self> {
        if options.get("highlight").and_then(Value::as_bool) != Some(true) {
            return None;
        }
        let (open, close) = options
            .get("highlight.tags")
            .and_then(Value::as_str)
            .and_then(|tags| tags.split_once(','))
            .unwrap_or(DEFAULT_HIGHLIGHT_TAGS);
        let size = options
            .get("highlight.size")
            .and_then(Value::as_u64)
            .map_or(DEFAULT_HIGHLIGHT_SIZE, |s| s as usize);
        Some(Self {
            open: open.to_string(),
            close: close.to_string(),
            size,
        })
    }

    fn render(&self, matched: &text::TextMatch, fields: &[FieldText]) -> Value {
        let mut out = Map::new();
        for field in fields {
            if let Some(spans) = matched.spans.get(&field.field) {
                let fragment = highlight(&field.text, spans, &self.open, &self.close, self.size);
                out.insert(field.field.clone(), json!([fragment]));
            }
        }
        Value::Object(out)
    }
}
