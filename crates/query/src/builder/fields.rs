//! Output field resolution.

use crate::error::{QueryError, QueryResult};
use crate::types::ModelDescriptor;

/// Resolves the output fields for a request.
///
/// With no requested list the model's default fields are returned in
/// declared order. Otherwise the caller's order is kept, duplicates are
/// collapsed, and any field the model does not declare is rejected.
pub fn resolve_fields(
    model: &ModelDescriptor,
    requested: Option<&[String]>,
) -> QueryResult<Vec<String>> {
    let requested = match requested {
        Some(list) if !list.is_empty() => list,
        _ => return Ok(model.default_fields.clone()),
    };

    let mut fields: Vec<String> = Vec::with_capacity(requested.len());
    for name in requested {
        if !model.is_queryable(name) {
            return Err(QueryError::InvalidField {
                model: model.name.clone(),
                field: name.clone(),
                message: "not an available output field".to_string(),
            });
        }
        if !fields.contains(name) {
            fields.push(name.clone());
        }
    }
    Ok(fields)
}
