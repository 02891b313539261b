//! Error types for query compilation.
//!
//! Every compilation failure is a client fault: the request reached us as
//! well-formed HTTP but its parameters cannot be processed, so both variants
//! map to a 422 with a `source.parameter` naming the offending parameter.

use mayday_jsonapi::error::{ErrorDocument, ErrorObject};
use thiserror::Error;

/// Result type for query compilation operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while compiling a request's query parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The `filter` parameter was not a well-formed predicate document.
    #[error("malformed filter: {detail}")]
    MalformedFilter {
        /// What was wrong with the payload.
        detail: String,
    },

    /// A parameter carried a value outside its domain.
    #[error("invalid value for {parameter}: {detail}")]
    InvalidParameter {
        /// The offending parameter, e.g. `page[size]`.
        parameter: String,
        /// What was wrong with the value.
        detail: String,
    },
}

impl QueryError {
    /// The query parameter this error refers to.
    pub fn parameter(&self) -> &str {
        match self {
            QueryError::MalformedFilter { .. } => "filter",
            QueryError::InvalidParameter { parameter, .. } => parameter,
        }
    }

    /// Renders the JSON:API error object for this failure.
    pub fn to_error_object(&self) -> ErrorObject {
        ErrorObject::new("422", "unprocessable_entity", "Unprocessable Entity")
            .with_detail(self.to_string())
            .with_parameter(self.parameter())
    }

    /// Renders the complete error response body.
    pub fn to_document(&self) -> ErrorDocument {
        ErrorDocument::of(self.to_error_object())
    }
}
