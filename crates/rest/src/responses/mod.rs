//! Response formatting for the query API.
//!
//! - [`format`] - JSON, JSONP and XML rendering of payloads and error envelopes
//! - [`xml`] - JSON to XML conversion
//! - [`legacy`] - XML key rewriting kept for older clients

pub mod format;
pub mod legacy;
pub mod xml;

pub use format::{Renderer, ResponseFormat, is_valid_callback};
pub use legacy::dasherize_vote_breakdowns;
pub use xml::to_xml_string;
