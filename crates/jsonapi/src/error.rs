//! JSON:API error objects.
//!
//! A failed request is answered with a document whose `errors` array names
//! what went wrong and, where possible, which part of the request caused it.
//! Status codes are carried as strings, following the JSON:API convention.

use serde::{Deserialize, Serialize};

/// The request element an error refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSource {
    /// A query parameter name, e.g. `filter` or `page[size]`.
    Parameter(String),
    /// A JSON pointer into the request body.
    Pointer(String),
}

/// A single JSON:API error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// The HTTP status code, as a string.
    pub status: String,
    /// An application-specific error code.
    pub code: String,
    /// A short, occurrence-independent summary.
    pub title: String,
    /// A description of this specific occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Where in the request the problem was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
}

impl ErrorObject {
    /// Creates an error object with the given status, code, and title.
    pub fn new(status: impl Into<String>, code: impl Into<String>, title: impl Into<String>) -> Self {
        ErrorObject {
            status: status.into(),
            code: code.into(),
            title: title.into(),
            detail: None,
            source: None,
        }
    }

    /// Attaches an occurrence-specific detail message.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Points the error at a query parameter.
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.source = Some(ErrorSource::Parameter(parameter.into()));
        self
    }

    /// Points the error at a JSON pointer in the request body.
    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.source = Some(ErrorSource::Pointer(pointer.into()));
        self
    }
}

/// The top-level body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    /// The errors that caused the request to fail.
    pub errors: Vec<ErrorObject>,
}

impl ErrorDocument {
    /// Wraps a single error object in a document.
    pub fn of(error: ErrorObject) -> Self {
        ErrorDocument {
            errors: vec![error],
        }
    }
}
