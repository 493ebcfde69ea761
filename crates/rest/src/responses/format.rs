//! Format-aware response building.
//!
//! Serializes payloads and error envelopes to JSON, JSONP or XML based on
//! the route's format suffix.

use std::sync::LazyLock;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use capitol_query::QueryError;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::{RestError, RestResult};
use crate::responses::legacy::dasherize_vote_breakdowns;
use crate::responses::xml::{ROOT_ELEMENT, to_xml_string};

/// JavaScript identifier path accepted as a JSONP callback.
static CALLBACK_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$.]*$").ok());

/// Output formats selected by the route suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// `application/json`, or JSONP with a callback.
    #[default]
    Json,
    /// `application/xml`.
    Xml,
}

impl ResponseFormat {
    /// Parses a route suffix.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(ResponseFormat::Json),
            "xml" => Some(ResponseFormat::Xml),
            _ => None,
        }
    }

    /// Returns the suffix for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/json",
            ResponseFormat::Xml => "application/xml",
        }
    }
}

/// Renders one request's payload or error envelope.
#[derive(Debug, Clone)]
pub struct Renderer {
    format: ResponseFormat,
    collection: String,
    callback: Option<String>,
}

impl Renderer {
    /// Creates a renderer for a collection in the given format.
    pub fn new(format: ResponseFormat, collection: impl Into<String>) -> Self {
        Self {
            format,
            collection: collection.into(),
            callback: None,
        }
    }

    /// Attaches a JSONP callback.
    ///
    /// A blank callback counts as absent, and XML output ignores it. A name
    /// that is not a JavaScript identifier path is rejected.
    pub fn with_callback(mut self, callback: Option<&str>) -> RestResult<Self> {
        let Some(name) = callback.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok(self);
        };
        if self.format == ResponseFormat::Xml {
            return Ok(self);
        }
        if !is_valid_callback(name) {
            return Err(QueryError::invalid_value(
                "callback",
                name,
                "a JavaScript identifier such as handleResults or app.render",
            )
            .into());
        }
        self.callback = Some(name.to_string());
        Ok(self)
    }

    /// Returns the output format.
    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Returns the JSONP callback, if any.
    pub fn callback(&self) -> Option<&str> {
        self.callback.as_deref()
    }

    /// Serializes a successful payload.
    pub fn render<T: Serialize>(&self, payload: &T) -> Response {
        match serde_json::to_value(payload) {
            Ok(value) => self.render_value(StatusCode::OK, value),
            Err(e) => self.render_error(&RestError::InternalError {
                message: format!("Failed to serialize response: {}", e),
            }),
        }
    }

    /// Serializes an error envelope in the requested format.
    pub fn render_error(&self, err: &RestError) -> Response {
        self.render_value(err.http_status(), err.envelope())
    }

    fn render_value(&self, status: StatusCode, mut value: Value) -> Response {
        match self.format {
            ResponseFormat::Json => {
                let body = value.to_string();
                match &self.callback {
                    Some(callback) => (
                        status,
                        [(header::CONTENT_TYPE, mime::APPLICATION_JAVASCRIPT.as_ref())],
                        format!("{}({});", callback, body),
                    )
                        .into_response(),
                    None => (
                        status,
                        [(header::CONTENT_TYPE, self.format.mime_type())],
                        body,
                    )
                        .into_response(),
                }
            }
            ResponseFormat::Xml => {
                dasherize_vote_breakdowns(&mut value, &self.collection);
                match to_xml_string(&value, ROOT_ELEMENT) {
                    Ok(xml) => (
                        status,
                        [(header::CONTENT_TYPE, self.format.mime_type())],
                        xml,
                    )
                        .into_response(),
                    Err(err) => err.into_response(),
                }
            }
        }
    }
}

/// Returns true if `name` is a JavaScript identifier path.
pub fn is_valid_callback(name: &str) -> bool {
    CALLBACK_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(name))
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::json;

    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn content_type(response: &Response) -> &str {
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(ResponseFormat::from_extension("json"), Some(ResponseFormat::Json));
        assert_eq!(ResponseFormat::from_extension("xml"), Some(ResponseFormat::Xml));
        assert_eq!(ResponseFormat::from_extension("csv"), None);
        assert_eq!(ResponseFormat::Xml.mime_type(), "application/xml");
        assert_eq!(ResponseFormat::Json.extension(), "json");
    }

    #[test]
    fn test_callback_validation() {
        assert!(is_valid_callback("handle"));
        assert!(is_valid_callback("$.app_1.render"));
        assert!(!is_valid_callback("1abc"));
        assert!(!is_valid_callback("alert(1)"));
        assert!(!is_valid_callback("a b"));
    }

    #[test]
    fn test_with_callback() {
        let json = Renderer::new(ResponseFormat::Json, "bills");
        assert!(json.clone().with_callback(None).unwrap().callback().is_none());
        assert!(json.clone().with_callback(Some("  ")).unwrap().callback().is_none());
        assert_eq!(
            json.clone().with_callback(Some("cb")).unwrap().callback(),
            Some("cb")
        );

        let err = json.with_callback(Some("x;alert(1)")).unwrap_err();
        assert_eq!(err.envelope_status(), 400);

        let xml = Renderer::new(ResponseFormat::Xml, "bills")
            .with_callback(Some("x;alert(1)"))
            .unwrap();
        assert!(xml.callback().is_none());
    }

    #[tokio::test]
    async fn test_render_json_and_jsonp() {
        let renderer = Renderer::new(ResponseFormat::Json, "bills");
        let response = renderer.render(&json!({"count": 0}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), "application/json");
        assert_eq!(body_string(response).await, r#"{"count":0}"#);

        let renderer = renderer.with_callback(Some("cb")).unwrap();
        let response = renderer.render(&json!({"count": 0}));
        assert_eq!(content_type(&response), "application/javascript");
        assert_eq!(body_string(response).await, r#"cb({"count":0});"#);
    }

    #[tokio::test]
    async fn test_render_error_envelope_as_xml() {
        let renderer = Renderer::new(ResponseFormat::Xml, "bills");
        let response = renderer.render_error(&QueryError::MissingTerm.into());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), "application/xml");

        let body = body_string(response).await;
        assert!(body.contains("<results>"));
        assert!(body.contains("<status type=\"integer\">400</status>"));
    }

    #[tokio::test]
    async fn test_xml_dasherizes_votes_only() {
        let payload = json!({"results": [{"vote_breakdown": {"total": {"Not Voting": 3}}}]});

        let votes = Renderer::new(ResponseFormat::Xml, "votes").render(&payload);
        assert!(body_string(votes).await.contains("<Not-Voting type=\"integer\">3</Not-Voting>"));

        let json = Renderer::new(ResponseFormat::Json, "votes").render(&payload);
        assert!(body_string(json).await.contains("Not Voting"));
    }
}
