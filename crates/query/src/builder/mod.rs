//! Request parameter builders.
//!
//! Each builder validates one concern of a request against the model
//! descriptor and produces the matching piece of an assembled query:
//!
//! | Builder | Input | Output |
//! |---------|-------|--------|
//! | [`options`] | raw parameters | [`QueryOptions`] / [`SearchOptions`] |
//! | [`fields`] | `fields` | output field list |
//! | [`conditions`] | filter parameters | [`Condition`](crate::types::Condition)s |
//! | [`order`] | `sort`, `order` | [`OrderSpec`](crate::types::OrderSpec) |
//! | [`pagination`] | `page`, `per_page` | [`Pagination`](crate::types::Pagination) |
//! | [`search`] | `query`, `q`, `search_fields` | term and search fields |

pub mod conditions;
pub mod fields;
pub mod options;
pub mod order;
pub mod pagination;
pub mod search;

pub use conditions::{build_conditions, coerce_value, parse_filter_name};
pub use fields::resolve_fields;
pub use options::{
    QueryOptions, RESERVED_PARAMS, SEARCH_RESERVED_PARAMS, SearchOptions, is_reserved,
};
pub use order::build_order;
pub use pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE, PageLimits, build_pagination};
pub use search::{resolve_search_fields, resolve_term};
