//! Capitol Query Translation Core
//!
//! This crate turns the raw parameters of a query or search request into a
//! validated, backend-neutral query object. Every registered model exposes
//! the same two request kinds without per-model code:
//!
//! - **queryable**: structured filtering, sorting and pagination
//! - **searchable**: full-text search, as an exact phrase or a relaxed
//!   query string
//!
//! # Architecture
//!
//! - [`types`] - Model descriptors, request parameters and assembled queries
//! - [`registry`] - Closed registry of model descriptors, with hot reload
//! - [`builder`] - Parameter parsing and the per-concern builders
//! - [`assembler`] - Builds a [`StructuredQuery`] or [`SearchQuery`]
//! - [`executor`] - The [`ResultExecutor`] boundary and timeout handling
//! - [`backends`] - Executor implementations (in-memory)
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```
//! use capitol_query::builder::{PageLimits, QueryOptions};
//! use capitol_query::executor::BackendCapabilities;
//! use capitol_query::types::RequestParameters;
//! use capitol_query::{ModelRegistry, assemble_query};
//!
//! let registry = ModelRegistry::builtin();
//! let model = registry.lookup("bills").unwrap();
//!
//! let params = RequestParameters::from_pairs([
//!     ("fields", "bill_id,title"),
//!     ("congress", "113"),
//!     ("introduced_on__gte", "2013-01-01"),
//!     ("sort", "-introduced_on"),
//!     ("per_page", "5"),
//! ]);
//! let options = QueryOptions::parse(&params).unwrap();
//! let query = assemble_query(
//!     &model,
//!     &options,
//!     &BackendCapabilities::all_operators(),
//!     &PageLimits::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(query.conditions.len(), 2);
//! assert_eq!(query.pagination.limit, 5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod assembler;
pub mod backends;
pub mod builder;
pub mod error;
pub mod executor;
pub mod registry;
pub mod types;

pub use assembler::{assemble_query, assemble_search};
pub use error::{ExecutorError, QueryError, QueryResult, RegistryError};
pub use executor::{BackendCapabilities, ResultExecutor, ResultSet};
pub use registry::{ModelRegistry, RegistryUpdate};
pub use types::{ExplainPlan, ModelDescriptor, SearchQuery, StructuredQuery};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
