//! Searchable path handler.
//!
//! `GET [base]/{collection}/search.{format}?query=...` for phrase searches,
//! `?q=...` for query string searches.

use axum::{
    extract::{Path, State},
    response::Response,
};
use capitol_query::builder::SearchOptions;
use capitol_query::types::RequestParameters;
use capitol_query::{ExplainPlan, ResultExecutor, assemble_search};
use tracing::debug;

use super::{execute_within, reject};
use crate::error::RestResult;
use crate::extractors::{QueryParams, RouteTarget, fallback_format};
use crate::responses::Renderer;
use crate::state::AppState;

/// Handler for the searchable path.
///
/// # HTTP Request
///
/// `GET [base]/bills/search.json?query=health care&search_fields=short_title`
///
/// # Response
///
/// - `200 OK` - Ranked results with a `search` object per record, the
///   explained query, or an error envelope
/// - `404 Not Found` - Unknown collection or malformed path
/// - `415 Unsupported Media Type` - Format other than `json` or `xml`
pub async fn searchable_handler<E>(
    State(state): State<AppState<E>>,
    Path((collection, action)): Path<(String, String)>,
    QueryParams(params): QueryParams,
) -> Response
where
    E: ResultExecutor,
{
    let path = format!("/{}/{}", collection, action);

    let target = match RouteTarget::searchable(&collection, &action) {
        Ok(target) => target,
        Err(err) => {
            let renderer = Renderer::new(fallback_format(&action), "");
            return reject(&renderer, &path, err);
        }
    };

    let plain = Renderer::new(target.format, &target.collection);
    let renderer = match plain.clone().with_callback(params.get("callback")) {
        Ok(renderer) => renderer,
        Err(err) => return reject(&plain, &path, err),
    };

    match run_search(&state, &target, &params, &renderer).await {
        Ok(response) => response,
        Err(err) => reject(&renderer, &path, err),
    }
}

async fn run_search<E>(
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
    let capabilities = executor.capabilities();

    let options = SearchOptions::parse(params, capabilities)?;
    let query = assemble_search(&model, &options, capabilities, &state.page_limits())?;

    if options.base.explain {
        let plan = ExplainPlan::from(query);
        debug!(collection = plan.model(), "Explaining search");
        return Ok(renderer.render(&plan));
    }

    debug!(
        collection = %target.collection,
        backend = executor.backend_name(),
        phrase = query.term.is_phrase(),
        search_fields = query.search_fields.len(),
        "Executing search"
    );

    let results =
        execute_within(state.config(), options.base.timeout_ms, executor.search(&query)).await?;

    debug!(
        collection = %target.collection,
        count = results.count,
        returned = results.results.len(),
        "Search complete"
    );

    Ok(renderer.render(&results))
}
