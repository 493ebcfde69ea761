//! Queryable path handler.
//!
//! `GET [base]/{collection}.{format}?filters`

use axum::{
    extract::{Path, State},
    response::Response,
};
use capitol_query::builder::QueryOptions;
use capitol_query::types::RequestParameters;
use capitol_query::{ExplainPlan, ResultExecutor, assemble_query};
use tracing::debug;

use super::{execute_within, reject};
use crate::error::RestResult;
use crate::extractors::{QueryParams, RouteTarget, fallback_format};
use crate::responses::Renderer;
use crate::state::AppState;

/// Handler for the queryable path.
///
/// Filters, sorts and paginates one collection.
///
/// # HTTP Request
///
/// `GET [base]/bills.json?chamber=house&introduced_on__gte=2013-01-01&sort=-introduced_on`
///
/// # Response
///
/// - `200 OK` - The result set, the explained query, or an error envelope
/// - `404 Not Found` - Unknown collection or no format suffix
/// - `415 Unsupported Media Type` - Format other than `json` or `xml`
pub async fn queryable_handler<E>(
    State(state): State<AppState<E>>,
    Path(segment): Path<String>,
    QueryParams(params): QueryParams,
) -> Response
where
    E: ResultExecutor,
{
    let path = format!("/{}", segment);

    let target = match RouteTarget::queryable(&segment) {
        Ok(target) => target,
        Err(err) => {
            let renderer = Renderer::new(fallback_format(&segment), "");
            return reject(&renderer, &path, err);
        }
    };

    let plain = Renderer::new(target.format, &target.collection);
    let renderer = match plain.clone().with_callback(params.get("callback")) {
        Ok(renderer) => renderer,
        Err(err) => return reject(&plain, &path, err),
    };

    match run_query(&state, &target, &params, &renderer).await {
        Ok(response) => response,
        Err(err) => reject(&renderer, &path, err),
    }
}

async fn run_query<E>(
    state: &AppState<E>,
    target: &RouteTarget,
    params: &RequestParameters,
    renderer: &Renderer,
) -> RestResult<Response>
where
    E: ResultExecutor,
{
    let model = state.registry().lookup(&target.collection)?;
    let executor = state.executor();

    let options = QueryOptions::parse(params)?;
    let query = assemble_query(
        &model,
        &options,
        executor.capabilities(),
        &state.page_limits(),
    )?;

    if options.explain {
        let plan = ExplainPlan::from(query);
        debug!(collection = plan.model(), "Explaining query");
        return Ok(renderer.render(&plan));
    }

    debug!(
        collection = %target.collection,
        backend = executor.backend_name(),
        conditions = query.conditions.len(),
        page = query.pagination.page,
        "Executing query"
    );

    let results = execute_within(state.config(), options.timeout_ms, executor.execute(&query)).await?;

    debug!(
        collection = %target.collection,
        count = results.count,
        returned = results.results.len(),
        "Query complete"
    );

    Ok(renderer.render(&results))
}
