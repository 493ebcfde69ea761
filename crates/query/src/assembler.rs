//! Query assembly.
//!
//! Runs every builder against a model descriptor and produces the query
//! object for either path. Pure data transformation: all validation
//! happens here, so a request that gets past assembly never fails on
//! its parameters later.

use tracing::debug;

use crate::builder::{
    PageLimits, QueryOptions, SearchOptions, build_conditions, build_order, build_pagination,
    resolve_fields, resolve_search_fields, resolve_term,
};
use crate::error::QueryResult;
use crate::executor::BackendCapabilities;
use crate::types::{ExplainPlan, ModelDescriptor, SearchQuery, StructuredQuery};

/// Assembles a queryable-path query.
pub fn assemble_query(
    model: &ModelDescriptor,
    options: &QueryOptions,
    capabilities: &BackendCapabilities,
    limits: &PageLimits,
) -> QueryResult<StructuredQuery> {
    let fields = resolve_fields(model, options.fields.as_deref())?;
    let conditions = build_conditions(model, &options.filters, capabilities)?;
    let order = build_order(model, options.sort.as_deref(), options.legacy_order.as_deref())?;
    let pagination = build_pagination(options.page, options.per_page, limits);

    debug!(
        model = %model.collection,
        fields = fields.len(),
        conditions = conditions.len(),
        "Assembled structured query"
    );

    Ok(StructuredQuery {
        model: model.collection.clone(),
        fields,
        conditions,
        order,
        pagination,
    })
}

/// Assembles a searchable-path query.
///
/// The search term is checked first, so a request without one reports the
/// missing term rather than any other problem.
pub fn assemble_search(
    model: &ModelDescriptor,
    options: &SearchOptions,
    capabilities: &BackendCapabilities,
    limits: &PageLimits,
) -> QueryResult<SearchQuery> {
    let term = resolve_term(options.phrase.as_deref(), options.free_text.as_deref())?;
    let search_fields = resolve_search_fields(model, options.search_fields.as_deref())?;

    let base = &options.base;
    let fields = resolve_fields(model, base.fields.as_deref())?;
    let filter = build_conditions(model, &base.filters, capabilities)?;
    let order = build_order(model, base.sort.as_deref(), base.legacy_order.as_deref())?;
    let pagination = build_pagination(base.page, base.per_page, limits);

    debug!(
        model = %model.collection,
        phrase = term.is_phrase(),
        search_fields = search_fields.len(),
        "Assembled search query"
    );

    Ok(SearchQuery {
        model: model.collection.clone(),
        term,
        search_fields,
        fields,
        filter,
        order,
        pagination,
        options: options.extras.clone(),
    })
}

impl From<StructuredQuery> for ExplainPlan {
    fn from(query: StructuredQuery) -> Self {
        ExplainPlan::Query(query)
    }
}

impl From<SearchQuery> for ExplainPlan {
    fn from(query: SearchQuery) -> Self {
        ExplainPlan::Search(query)
    }
}

impl ExplainPlan {
    /// Returns the collection the plan targets.
    pub fn model(&self) -> &str {
        match self {
            ExplainPlan::Query(q) => &q.model,
            ExplainPlan::Search(q) => &q.model,
        }
    }
}
