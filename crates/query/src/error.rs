//! Error types for the query translation core.
//!
//! Validation errors are raised while a request is being translated, before
//! any executor call. Executor errors come back from the backend boundary and
//! are folded into [`QueryError`] so the HTTP layer has one type to map.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for query translation and execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The requested collection does not map to a registered model.
    #[error("unknown model: {collection}")]
    UnknownModel { collection: String },

    /// A parameter references a field the model does not allow in that position.
    #[error("invalid field '{field}' for {model}: {message}")]
    InvalidField {
        model: String,
        field: String,
        message: String,
    },

    /// A filter parameter uses an operator suffix that is unknown or unsupported.
    #[error("invalid operator '{operator}' in parameter '{parameter}'")]
    InvalidOperator { parameter: String, operator: String },

    /// A parameter value could not be coerced to the expected type.
    #[error("invalid value '{value}' for parameter '{parameter}': expected {expected}")]
    InvalidValue {
        parameter: String,
        value: String,
        expected: String,
    },

    /// Neither a phrase nor a free-text search term was supplied.
    #[error(
        "You must provide a search term with the 'query' parameter (for phrase searches) or 'q' parameter (for query string searches)."
    )]
    MissingTerm,

    /// None of the requested search fields are searchable for the model.
    #[error("You must search one of the following fields for {collection}: {}", valid.join(", "))]
    NoSearchableFields {
        collection: String,
        valid: Vec<String>,
    },

    /// The backend did not answer within the allotted time.
    #[error("backend timed out after {timeout_ms}ms")]
    BackendTimeout { timeout_ms: u64 },

    /// The backend could not be reached.
    #[error("backend unavailable: {message}")]
    BackendUnavailable { message: String },

    /// The backend failed while executing a query.
    #[error("backend error: {message}")]
    Backend { message: String },
}

impl QueryError {
    /// Convenience constructor for [`QueryError::InvalidValue`].
    pub fn invalid_value(
        parameter: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        QueryError::InvalidValue {
            parameter: parameter.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Returns true if this error was detected during request validation,
    /// as opposed to during backend execution.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidField { .. }
                | QueryError::InvalidOperator { .. }
                | QueryError::InvalidValue { .. }
                | QueryError::MissingTerm
                | QueryError::NoSearchableFields { .. }
        )
    }
}

/// Errors originating from a [`ResultExecutor`](crate::executor::ResultExecutor).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutorError {
    /// The call exceeded its deadline.
    #[error("executor timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The backend is not reachable.
    #[error("backend {backend_name} unavailable: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Any other backend failure.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
    },
}

impl From<ExecutorError> for QueryError {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Timeout { timeout_ms } => QueryError::BackendTimeout { timeout_ms },
            ExecutorError::Unavailable { .. } => QueryError::BackendUnavailable {
                message: err.to_string(),
            },
            ExecutorError::Internal { .. } => QueryError::Backend {
                message: err.to_string(),
            },
        }
    }
}

/// Errors raised while loading or reloading model descriptors.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The descriptor file could not be read.
    #[error("failed to read descriptor file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor file is not valid JSON for the expected shape.
    #[error("failed to parse descriptors: {0}")]
    Parse(#[from] serde_json::Error),

    /// A descriptor is internally inconsistent.
    #[error("invalid descriptor for {model}: {message}")]
    InvalidDescriptor { model: String, message: String },

    /// Two descriptors claim the same collection.
    #[error("duplicate collection: {collection}")]
    DuplicateCollection { collection: String },
}

/// Result type alias for translation operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type alias for executor operations.
pub type ExecutorResult<T> = Result<T, ExecutorError>;
