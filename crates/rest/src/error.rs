//! Error types for the query API.
//!
//! Every error a caller can trigger is reported as the same envelope,
//! `{"error": message, "status": code}`, in the requested format. Callers
//! read the envelope's `status`; the transport status stays 200 except
//! for route-level problems.
//!
//! # Error Mapping
//!
//! | Error | Envelope `status` | HTTP |
//! |-------|-------------------|------|
//! | InvalidField / InvalidOperator / InvalidValue | 400 | 200 |
//! | MissingTerm / NoSearchableFields | 400 | 200 |
//! | UnknownModel | 404 | 404 |
//! | NotFound (no format suffix) | 404 | 404 |
//! | UnsupportedFormat | 415 | 415 |
//! | BackendTimeout | 504 | 200 |
//! | BackendUnavailable | 503 | 200 |
//! | Backend / InternalError | 500 | 200 |

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use capitol_query::QueryError;
use serde_json::{Value, json};

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// A translation or executor error from the query core.
    Query(QueryError),

    /// The route has no recognizable format suffix (HTTP 404).
    NotFound {
        /// The request path.
        path: String,
    },

    /// The format suffix is not `json` or `xml` (HTTP 415).
    UnsupportedFormat {
        /// The requested format.
        format: String,
    },

    /// Rendering or another server-side step failed.
    InternalError {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::Query(err) => write!(f, "{}", err),
            RestError::NotFound { path } => write!(f, "Not found: {}", path),
            RestError::UnsupportedFormat { format } => {
                write!(f, "Unsupported format '{}': use json or xml", format)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RestError::Query(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QueryError> for RestError {
    fn from(err: QueryError) -> Self {
        RestError::Query(err)
    }
}

impl RestError {
    /// The code reported in the envelope's `status` field.
    pub fn envelope_status(&self) -> u16 {
        match self {
            RestError::Query(err) if err.is_validation() => 400,
            RestError::Query(err) => match err {
                QueryError::UnknownModel { .. } => 404,
                QueryError::BackendTimeout { .. } => 504,
                QueryError::BackendUnavailable { .. } => 503,
                _ => 500,
            },
            RestError::NotFound { .. } => 404,
            RestError::UnsupportedFormat { .. } => 415,
            RestError::InternalError { .. } => 500,
        }
    }

    /// The transport status code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            RestError::Query(QueryError::UnknownModel { .. }) | RestError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            RestError::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::OK,
        }
    }

    /// Builds the error envelope.
    pub fn envelope(&self) -> Value {
        json!({
            "error": self.to_string(),
            "status": self.envelope_status(),
        })
    }

    /// Returns true if the caller sent a bad request.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.envelope_status())
    }
}

/// Renders the envelope as JSON. Format-aware rendering lives in
/// [`Renderer::render_error`](crate::responses::Renderer::render_error).
impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self.envelope())).into_response()
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_use_envelope_only() {
        let err: RestError = QueryError::MissingTerm.into();
        assert_eq!(err.envelope_status(), 400);
        assert_eq!(err.http_status(), StatusCode::OK);
        assert!(err.is_client_error());
        assert_eq!(
            err.envelope()["error"],
            "You must provide a search term with the 'query' parameter (for phrase searches) or 'q' parameter (for query string searches)."
        );
    }

    #[test]
    fn test_unknown_model_is_route_level() {
        let err: RestError = QueryError::UnknownModel {
            collection: "widgets".to_string(),
        }
        .into();
        assert_eq!(err.envelope_status(), 404);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_backend_errors() {
        let timeout: RestError = QueryError::BackendTimeout { timeout_ms: 100 }.into();
        assert_eq!(timeout.envelope_status(), 504);
        assert_eq!(timeout.http_status(), StatusCode::OK);
        assert!(!timeout.is_client_error());

        let unavailable: RestError = QueryError::BackendUnavailable {
            message: "down".to_string(),
        }
        .into();
        assert_eq!(unavailable.envelope_status(), 503);
    }

    #[test]
    fn test_unsupported_format() {
        let err = RestError::UnsupportedFormat {
            format: "csv".to_string(),
        };
        assert_eq!(err.http_status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.envelope()["status"], 415);
    }
}
