//! Core types for the translation layer.
//!
//! - [`ModelDescriptor`] - Per-model capability metadata
//! - [`RequestParameters`] - Raw request parameters
//! - [`StructuredQuery`], [`SearchQuery`], [`ExplainPlan`] - Assembled queries
//!
//! # Example
//!
//! ```
//! use capitol_query::types::{Condition, Operator, TypedValue};
//!
//! let condition = Condition::new("status", Operator::Eq, TypedValue::String("active".into()));
//! assert_eq!(condition.operator.to_string(), "eq");
//! ```

mod descriptor;
mod params;
mod query;

pub use descriptor::{FieldSpec, FieldType, ModelDescriptor, SearchFieldSpec};
pub use params::RequestParameters;
pub use query::{
    Condition, ExplainPlan, Operator, OrderSpec, Pagination, SearchQuery, SearchTerm,
    SortDirection, SortDirective, StructuredQuery, TypedValue,
};
