//! Filter condition building.
//!
//! A filter parameter name is a field name with an optional operator
//! suffix. Three spellings are recognized, tried in this order:
//!
//! - `status` - the whole name is a field, the operator is `eq`
//! - `congress__gte` - canonical double-underscore suffix
//! - `congress_gte` - short form, only when the prefix is a field and the
//!   suffix a known operator
//!
//! Values are coerced by the field's declared type.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{QueryError, QueryResult};
use crate::executor::BackendCapabilities;
use crate::types::{Condition, FieldType, ModelDescriptor, Operator, TypedValue};

/// Builds the filter conditions for a request.
///
/// `filters` are `(parameter name, raw value)` pairs; every pair produces
/// one condition, in input order.
pub fn build_conditions(
    model: &ModelDescriptor,
    filters: &[(String, String)],
    capabilities: &BackendCapabilities,
) -> QueryResult<Vec<Condition>> {
    filters
        .iter()
        .map(|(name, value)| build_condition(model, name, value, capabilities))
        .collect()
}

fn build_condition(
    model: &ModelDescriptor,
    name: &str,
    raw: &str,
    capabilities: &BackendCapabilities,
) -> QueryResult<Condition> {
    let (field, operator) = parse_filter_name(model, name)?;

    if !capabilities.supports(operator) {
        return Err(QueryError::InvalidOperator {
            parameter: name.to_string(),
            operator: operator.to_string(),
        });
    }

    let field_type = model.field_type(field).unwrap_or_default();
    if !operator.is_valid_for(field_type) {
        return Err(QueryError::InvalidOperator {
            parameter: name.to_string(),
            operator: operator.to_string(),
        });
    }

    let value = coerce_value(name, raw, field_type, operator)?;
    Ok(Condition::new(field, operator, value))
}

/// Splits a filter parameter name into its field and operator.
pub fn parse_filter_name<'a>(
    model: &ModelDescriptor,
    name: &'a str,
) -> QueryResult<(&'a str, Operator)> {
    if model.is_queryable(name) {
        return Ok((name, Operator::Eq));
    }

    if let Some((field, suffix)) = name.rsplit_once("__") {
        if !model.is_queryable(field) {
            return Err(unknown_field(model, field));
        }
        return Operator::parse(suffix)
            .map(|op| (field, op))
            .ok_or_else(|| QueryError::InvalidOperator {
                parameter: name.to_string(),
                operator: suffix.to_string(),
            });
    }

    if let Some((field, suffix)) = name.rsplit_once('_')
        && model.is_queryable(field)
        && let Some(op) = Operator::parse(suffix)
    {
        return Ok((field, op));
    }

    Err(unknown_field(model, name))
}

fn unknown_field(model: &ModelDescriptor, field: &str) -> QueryError {
    QueryError::InvalidField {
        model: model.name.clone(),
        field: field.to_string(),
        message: "not a filterable field".to_string(),
    }
}

/// Coerces a raw parameter value for the given field type and operator.
pub fn coerce_value(
    parameter: &str,
    raw: &str,
    field_type: FieldType,
    operator: Operator,
) -> QueryResult<TypedValue> {
    match operator {
        Operator::Exists => parse_bool(raw)
            .map(TypedValue::Boolean)
            .ok_or_else(|| QueryError::invalid_value(parameter, raw, "boolean")),
        Operator::Match => Ok(TypedValue::String(raw.to_string())),
        op if op.takes_list() => {
            let items = raw
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|item| coerce_scalar(parameter, item, field_type))
                .collect::<QueryResult<Vec<_>>>()?;
            if items.is_empty() {
                return Err(QueryError::invalid_value(
                    parameter,
                    raw,
                    format!("a |-separated list of {}", field_type),
                ));
            }
            Ok(TypedValue::List(items))
        }
        Operator::Eq | Operator::Ne if raw == "null" => Ok(TypedValue::Null),
        _ => coerce_scalar(parameter, raw, field_type),
    }
}

fn coerce_scalar(parameter: &str, raw: &str, field_type: FieldType) -> QueryResult<TypedValue> {
    let invalid = || QueryError::invalid_value(parameter, raw, field_type.to_string());

    match field_type {
        FieldType::String => Ok(TypedValue::String(raw.to_string())),
        FieldType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(TypedValue::Integer)
            .map_err(|_| invalid()),
        FieldType::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(TypedValue::Float)
            .ok_or_else(invalid),
        FieldType::Boolean => parse_bool(raw).map(TypedValue::Boolean).ok_or_else(invalid),
        FieldType::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(TypedValue::Date)
            .map_err(|_| invalid()),
        FieldType::Timestamp => parse_timestamp(raw.trim())
            .map(TypedValue::Timestamp)
            .ok_or_else(invalid),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Accepts RFC 3339 or a bare date, read as midnight UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
