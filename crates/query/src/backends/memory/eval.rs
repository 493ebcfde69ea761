//! Condition evaluation, sorting and projection over JSON records.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::types::{Condition, Operator, SortDirection, SortDirective, TypedValue};

/// Looks up a dotted path (`history.active`) in a record.
pub(crate) fn lookup<'a>(record: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Returns true if the record satisfies every condition.
pub(crate) fn matches_all(record: &Map<String, Value>, conditions: &[Condition]) -> bool {
    conditions.iter().all(|c| matches(record, c))
}

/// Evaluates one condition.
///
/// Array fields match element-wise: `eq` holds if any element is equal,
/// `all` if every listed value is among the elements. A missing field
/// satisfies `ne` and `nin`.
pub(crate) fn matches(record: &Map<String, Value>, condition: &Condition) -> bool {
    let found = lookup(record, &condition.field).filter(|v| !v.is_null());
    let candidates: Vec<&Value> = match found {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(v) => vec![v],
        None => Vec::new(),
    };
    let any = |pred: &dyn Fn(&Value) -> bool| candidates.iter().any(|v| pred(v));

    match (&condition.operator, &condition.value) {
        (Operator::Eq, TypedValue::Null) => found.is_none(),
        (Operator::Ne, TypedValue::Null) => found.is_some(),
        (Operator::Exists, TypedValue::Boolean(expected)) => found.is_some() == *expected,
        (Operator::Eq, value) => any(&|v| equals(v, value)),
        (Operator::Ne, value) => !any(&|v| equals(v, value)),
        (Operator::Gt, value) => any(&|v| compare(v, value) == Some(Ordering::Greater)),
        (Operator::Gte, value) => any(&|v| {
            matches!(compare(v, value), Some(Ordering::Greater | Ordering::Equal))
        }),
        (Operator::Lt, value) => any(&|v| compare(v, value) == Some(Ordering::Less)),
        (Operator::Lte, value) => {
            any(&|v| matches!(compare(v, value), Some(Ordering::Less | Ordering::Equal)))
        }
        (Operator::In, TypedValue::List(items)) => {
            any(&|v| items.iter().any(|item| equals(v, item)))
        }
        (Operator::Nin, TypedValue::List(items)) => {
            !any(&|v| items.iter().any(|item| equals(v, item)))
        }
        (Operator::All, TypedValue::List(items)) => {
            !candidates.is_empty() && items.iter().all(|item| any(&|v| equals(v, item)))
        }
        (Operator::Match, TypedValue::String(needle)) => {
            let needle = needle.to_lowercase();
            any(&|v| v.as_str().is_some_and(|s| s.to_lowercase().contains(&needle)))
        }
        _ => false,
    }
}

fn equals(value: &Value, typed: &TypedValue) -> bool {
    compare(value, typed) == Some(Ordering::Equal)
}

/// Compares a record value against a typed filter value.
fn compare(value: &Value, typed: &TypedValue) -> Option<Ordering> {
    match typed {
        TypedValue::String(s) => value.as_str().map(|v| v.cmp(s.as_str())),
        TypedValue::Integer(i) => match value.as_i64() {
            Some(v) => Some(v.cmp(i)),
            None => value.as_f64()?.partial_cmp(&(*i as f64)),
        },
        TypedValue::Float(f) => value.as_f64()?.partial_cmp(f),
        TypedValue::Boolean(b) => value.as_bool().map(|v| v.cmp(b)),
        TypedValue::Date(d) => value_as_date(value).map(|v| v.cmp(d)),
        TypedValue::Timestamp(t) => value_as_timestamp(value).map(|v| v.cmp(t)),
        TypedValue::Null => value.is_null().then_some(Ordering::Equal),
        TypedValue::List(_) => None,
    }
}

fn value_as_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?;
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|t| t.date_naive()))
}

fn value_as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

/// Orders two records by the sort directives. Missing and null values
/// sort last in either direction.
pub(crate) fn compare_records(
    a: &Map<String, Value>,
    b: &Map<String, Value>,
    order: &[SortDirective],
) -> Ordering {
    for directive in order {
        let left = lookup(a, &directive.field).filter(|v| !v.is_null());
        let right = lookup(b, &directive.field).filter(|v| !v.is_null());

        let ordering = match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(l), Some(r)) => {
                let ord = compare_json(l, r);
                match directive.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_json(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => l.cmp(&r),
            _ => l
                .as_f64()
                .partial_cmp(&r.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(l), Value::String(r)) => l.cmp(r),
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        _ => Ordering::Equal,
    }
}

/// Projects a record onto the requested fields.
///
/// Dotted fields are written back nested (`history.active` becomes
/// `{"history": {"active": ...}}`). Fields the record lacks are omitted.
pub(crate) fn project(record: &Map<String, Value>, fields: &[String]) -> Map<String, Value> {
    let mut out = Map::new();
    for field in fields {
        if let Some(value) = lookup(record, field) {
            insert_path(&mut out, field, value.clone());
        }
    }
    out
}

fn insert_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}
