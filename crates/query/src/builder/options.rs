//! Parameter parsing.
//!
//! Turns raw [`RequestParameters`] into typed option structs. Control
//! parameters are pulled out and coerced here; everything else becomes a
//! filter parameter for the condition builder.

use std::collections::BTreeMap;
use std::num::IntErrorKind;

use serde_json::Value;

use crate::error::{QueryError, QueryResult};
use crate::executor::{BackendCapabilities, OptionKind};
use crate::types::RequestParameters;

/// Control parameters reserved on both paths.
pub const RESERVED_PARAMS: &[&str] = &[
    "fields", "sort", "order", "page", "per_page", "explain", "callback", "format", "apikey",
    "timeout",
];

/// Additional control parameters reserved on the search path.
pub const SEARCH_RESERVED_PARAMS: &[&str] = &["query", "q", "search_fields"];

/// Returns true if the parameter is a control parameter on the queryable path.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_PARAMS.contains(&name)
}

/// Typed options for the queryable path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Requested output fields (`fields`).
    pub fields: Option<Vec<String>>,
    /// Filter parameters as `(name, value)` pairs, in name then value order.
    pub filters: Vec<(String, String)>,
    /// Sort items (`sort`).
    pub sort: Option<Vec<String>>,
    /// Legacy sort items (`order`, `field__desc` style).
    pub legacy_order: Option<Vec<String>>,
    /// Raw page number (`page`).
    pub page: Option<i64>,
    /// Raw page size (`per_page`).
    pub per_page: Option<i64>,
    /// Return the assembled query instead of executing it.
    pub explain: bool,
    /// Caller-requested executor timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl QueryOptions {
    /// Parses queryable-path options.
    pub fn parse(params: &RequestParameters) -> QueryResult<Self> {
        parse_common(params, is_reserved)
    }
}

/// Typed options for the searchable path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// The options shared with the queryable path.
    pub base: QueryOptions,
    /// Phrase search text (`query`), blank treated as absent.
    pub phrase: Option<String>,
    /// Free-text search text (`q`), blank treated as absent.
    pub free_text: Option<String>,
    /// Requested search fields (`search_fields`).
    pub search_fields: Option<Vec<String>>,
    /// Backend-declared extra options, coerced to JSON.
    pub extras: BTreeMap<String, Value>,
}

impl SearchOptions {
    /// Parses searchable-path options.
    ///
    /// Parameters named after a search option declared in `capabilities`
    /// are coerced by their declared kind and kept out of the filters.
    pub fn parse(
        params: &RequestParameters,
        capabilities: &BackendCapabilities,
    ) -> QueryResult<Self> {
        let reserved = |name: &str| {
            is_reserved(name)
                || SEARCH_RESERVED_PARAMS.contains(&name)
                || capabilities.search_option(name).is_some()
        };
        let base = parse_common(params, reserved)?;

        let mut extras = BTreeMap::new();
        for spec in &capabilities.search_options {
            if let Some(raw) = params.get_non_blank(&spec.name) {
                extras.insert(spec.name.clone(), coerce_option(&spec.name, raw, spec.kind)?);
            }
        }

        Ok(Self {
            base,
            phrase: params.get_non_blank("query").map(|s| s.trim().to_string()),
            free_text: params.get_non_blank("q").map(|s| s.trim().to_string()),
            search_fields: params.list("search_fields"),
            extras,
        })
    }
}

fn parse_common(
    params: &RequestParameters,
    reserved: impl Fn(&str) -> bool,
) -> QueryResult<QueryOptions> {
    let mut filters = Vec::new();
    for (name, values) in params.iter() {
        if reserved(name) {
            continue;
        }
        for value in values {
            filters.push((name.clone(), value.clone()));
        }
    }

    Ok(QueryOptions {
        fields: params.list("fields"),
        filters,
        sort: params.list("sort"),
        legacy_order: params.list("order"),
        page: parse_integer(params, "page")?,
        per_page: parse_integer(params, "per_page")?,
        explain: parse_explain(params)?,
        timeout_ms: parse_timeout(params)?,
    })
}

fn parse_integer(params: &RequestParameters, name: &str) -> QueryResult<Option<i64>> {
    match params.get_non_blank(name) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(value) => Ok(Some(value)),
            // Out-of-range numbers saturate; pagination clamps them later.
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow => Ok(Some(i64::MAX)),
                IntErrorKind::NegOverflow => Ok(Some(i64::MIN)),
                _ => Err(QueryError::invalid_value(name, raw, "integer")),
            },
        },
    }
}

fn parse_explain(params: &RequestParameters) -> QueryResult<bool> {
    match params.get("explain") {
        None => Ok(false),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(QueryError::invalid_value("explain", other, "true or false")),
    }
}

fn parse_timeout(params: &RequestParameters) -> QueryResult<Option<u64>> {
    match params.get_non_blank("timeout") {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| {
            QueryError::invalid_value("timeout", raw, "a non-negative integer (milliseconds)")
        }),
    }
}

fn coerce_option(name: &str, raw: &str, kind: OptionKind) -> QueryResult<Value> {
    match kind {
        OptionKind::Boolean => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(QueryError::invalid_value(name, raw, "true or false")),
        },
        OptionKind::Integer => raw
            .trim()
            .parse::<u64>()
            .map(Value::from)
            .map_err(|_| QueryError::invalid_value(name, raw, "a non-negative integer")),
        OptionKind::String => Ok(Value::String(raw.to_string())),
    }
}
