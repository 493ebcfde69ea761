//! Axum extractors for the query API.
//!
//! - [`QueryParams`] - Collect raw query string parameters, repeats included
//! - [`RouteTarget`] - Split a `{collection}.{format}` path segment

mod params;
mod route;

pub use params::QueryParams;
pub use route::{RouteTarget, fallback_format};
