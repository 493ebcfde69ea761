//! Assembled query types.
//!
//! These are the outputs of the translation core: a [`StructuredQuery`] for
//! the queryable path and a [`SearchQuery`] for the searchable path. Both
//! serialize losslessly so that explain output can be fed back in.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::descriptor::{FieldType, SearchFieldSpec};

/// Filter operators.
///
/// This is the full inventory the core knows how to parse. Which of them a
/// deployment accepts is declared by the executor backend through
/// [`BackendCapabilities`](crate::executor::BackendCapabilities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Equal (the implied operator when no suffix is given).
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Value is one of a set.
    In,
    /// Value is none of a set.
    Nin,
    /// Array field contains all of a set.
    All,
    /// Field is present (or absent).
    Exists,
    /// Case-insensitive substring match on a string field.
    Match,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::All => "all",
            Operator::Exists => "exists",
            Operator::Match => "match",
        };
        write!(f, "{}", s)
    }
}

impl Operator {
    /// Every operator the core can parse.
    pub const ALL: [Operator; 11] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::Nin,
        Operator::All,
        Operator::Exists,
        Operator::Match,
    ];

    /// Parses an operator suffix, returning None for unknown suffixes.
    ///
    /// `not` is accepted as the legacy spelling of `ne`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "eq" => Some(Operator::Eq),
            "ne" | "not" => Some(Operator::Ne),
            "gt" => Some(Operator::Gt),
            "gte" => Some(Operator::Gte),
            "lt" => Some(Operator::Lt),
            "lte" => Some(Operator::Lte),
            "in" => Some(Operator::In),
            "nin" => Some(Operator::Nin),
            "all" => Some(Operator::All),
            "exists" => Some(Operator::Exists),
            "match" => Some(Operator::Match),
            _ => None,
        }
    }

    /// Returns true if the operator takes a `|`-separated list of values.
    pub fn takes_list(&self) -> bool {
        matches!(self, Operator::In | Operator::Nin | Operator::All)
    }

    /// Returns true if this operator is meaningful for the given field type.
    pub fn is_valid_for(&self, field_type: FieldType) -> bool {
        match self {
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
                field_type != FieldType::Boolean
            }
            Operator::Match => field_type == FieldType::String,
            _ => true,
        }
    }
}

/// A filter value coerced to the field's declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypedValue {
    /// A string.
    String(String),
    /// An integer.
    Integer(i64),
    /// A float.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// A calendar date.
    Date(NaiveDate),
    /// A UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// Explicit null.
    Null,
    /// A set of values for list operators.
    List(Vec<TypedValue>),
}

impl TypedValue {
    /// Converts the value to the JSON shape a record would hold.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Integer(i) => Value::from(*i),
            TypedValue::Float(f) => Value::from(*f),
            TypedValue::Boolean(b) => Value::Bool(*b),
            TypedValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            TypedValue::Timestamp(t) => Value::String(t.to_rfc3339()),
            TypedValue::Null => Value::Null,
            TypedValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

/// One filter predicate. All conditions of a query combine with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// The field being filtered.
    pub field: String,
    /// The comparison operator.
    pub operator: Operator,
    /// The coerced value.
    pub value: TypedValue,
}

impl Condition {
    /// Creates a new condition.
    pub fn new(field: impl Into<String>, operator: Operator, value: TypedValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Creates an equality condition.
    pub fn eq(field: impl Into<String>, value: TypedValue) -> Self {
        Self::new(field, Operator::Eq, value)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// A sort directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

impl SortDirective {
    /// Parses a sort item (e.g., "-introduced_on" for descending).
    pub fn parse(s: &str) -> Self {
        if let Some(stripped) = s.strip_prefix('-') {
            Self {
                field: stripped.to_string(),
                direction: SortDirection::Desc,
            }
        } else {
            Self {
                field: s.strip_prefix('+').unwrap_or(s).to_string(),
                direction: SortDirection::Asc,
            }
        }
    }

    /// Parses a legacy `field__asc` / `field__desc` item.
    pub fn parse_legacy(s: &str) -> Self {
        if let Some(field) = s.strip_suffix("__desc") {
            Self {
                field: field.to_string(),
                direction: SortDirection::Desc,
            }
        } else {
            Self {
                field: s.strip_suffix("__asc").unwrap_or(s).to_string(),
                direction: SortDirection::Asc,
            }
        }
    }
}

/// Ordered sort specification. Empty means the backend's natural order.
pub type OrderSpec = Vec<SortDirective>;

/// Bounded offset/limit pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub per_page: u64,
    /// Number of records to skip.
    pub offset: u64,
    /// Maximum number of records to return.
    pub limit: u64,
}

/// A full-text search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "text", rename_all = "snake_case")]
pub enum SearchTerm {
    /// Exact phrase search (`query` parameter).
    Phrase(String),
    /// Relaxed query-string search (`q` parameter).
    FreeText(String),
}

impl SearchTerm {
    /// Returns the search text.
    pub fn text(&self) -> &str {
        match self {
            SearchTerm::Phrase(s) | SearchTerm::FreeText(s) => s,
        }
    }

    /// Returns true for phrase searches.
    pub fn is_phrase(&self) -> bool {
        matches!(self, SearchTerm::Phrase(_))
    }
}

/// Output of the queryable path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredQuery {
    /// The collection being queried.
    pub model: String,
    /// Output fields, in order.
    pub fields: Vec<String>,
    /// Filter predicates (ANDed).
    pub conditions: Vec<Condition>,
    /// Sort specification.
    pub order: OrderSpec,
    /// Pagination window.
    pub pagination: Pagination,
}

/// Output of the searchable path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The collection being searched.
    pub model: String,
    /// The search term.
    pub term: SearchTerm,
    /// Fields to search, with weights.
    pub search_fields: Vec<SearchFieldSpec>,
    /// Output fields, in order.
    pub fields: Vec<String>,
    /// Filter predicates applied to matches (ANDed).
    pub filter: Vec<Condition>,
    /// Sort specification. Empty means relevance order.
    pub order: OrderSpec,
    /// Pagination window.
    pub pagination: Pagination,
    /// Backend-specific extra options.
    pub options: BTreeMap<String, serde_json::Value>,
}

/// An assembled query returned as data instead of being executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplainPlan {
    /// A queryable-path plan.
    Query(StructuredQuery),
    /// A searchable-path plan.
    Search(SearchQuery),
}
