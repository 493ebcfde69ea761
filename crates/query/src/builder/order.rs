//! Sort order building.

use crate::error::{QueryError, QueryResult};
use crate::types::{ModelDescriptor, OrderSpec, SortDirective};

/// Builds the sort order for a request.
///
/// `sort` items use `-field` / `+field`; legacy `order` items use
/// `field__desc` / `field__asc` and are appended after them. A field that
/// appears twice keeps its first direction. No items means the backend's
/// natural order.
pub fn build_order(
    model: &ModelDescriptor,
    sort: Option<&[String]>,
    legacy_order: Option<&[String]>,
) -> QueryResult<OrderSpec> {
    let directives = sort
        .unwrap_or_default()
        .iter()
        .map(|item| SortDirective::parse(item))
        .chain(
            legacy_order
                .unwrap_or_default()
                .iter()
                .map(|item| SortDirective::parse_legacy(item)),
        );

    let mut order: OrderSpec = Vec::new();
    for directive in directives {
        if !model.is_sortable(&directive.field) {
            return Err(QueryError::InvalidField {
                model: model.name.clone(),
                field: directive.field,
                message: "not a sortable field".to_string(),
            });
        }
        if order.iter().all(|d| d.field != directive.field) {
            order.push(directive);
        }
    }
    Ok(order)
}
