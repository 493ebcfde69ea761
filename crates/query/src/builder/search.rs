//! Search term and search field resolution.

use crate::error::{QueryError, QueryResult};
use crate::types::{ModelDescriptor, SearchFieldSpec, SearchTerm};

/// Resolves the search term from the phrase (`query`) and free-text (`q`)
/// parameters. Phrase wins when both are given; blank text counts as absent.
pub fn resolve_term(phrase: Option<&str>, free_text: Option<&str>) -> QueryResult<SearchTerm> {
    fn non_blank(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }

    if let Some(text) = non_blank(phrase) {
        Ok(SearchTerm::Phrase(text.to_string()))
    } else if let Some(text) = non_blank(free_text) {
        Ok(SearchTerm::FreeText(text.to_string()))
    } else {
        Err(QueryError::MissingTerm)
    }
}

/// Resolves which fields to search.
///
/// With no requested list every searchable field is used, in declared
/// order with its weight. Otherwise the requested names that are
/// searchable are kept in caller order. An empty result lists the valid
/// fields in the error.
pub fn resolve_search_fields(
    model: &ModelDescriptor,
    requested: Option<&[String]>,
) -> QueryResult<Vec<SearchFieldSpec>> {
    let fields: Vec<SearchFieldSpec> = match requested {
        Some(list) if !list.is_empty() => {
            let mut fields: Vec<SearchFieldSpec> = Vec::new();
            for spec in list.iter().filter_map(|name| model.searchable_field(name)) {
                if !fields.iter().any(|f| f.field == spec.field) {
                    fields.push(spec.clone());
                }
            }
            fields
        }
        _ => model.searchable.clone(),
    };

    if fields.is_empty() {
        return Err(QueryError::NoSearchableFields {
            collection: model.collection.clone(),
            valid: model.searchable_names(),
        });
    }
    Ok(fields)
}
