//! Error types for theme operations.
//!
//! This module provides the [`ThemeError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

use crate::host::HostError;

/// Error type for all theme library operations.
///
/// Missing optional fields are never errors; this type covers structural
/// violations, configuration problems and failures reported by the host.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// A dataset or resource record violates the expected shape.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The theme configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// RDF graph construction or serialization failed.
    #[error("RDF error: {0}")]
    Rdf(String),

    /// A submitted value failed validation.
    #[error("Validation error on '{field}': {message}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// Human readable message.
        message: String,
    },

    /// The requested object does not exist on the host.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The acting user may not perform the operation.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Any other failure reported by the host platform.
    #[error("Host error: {0}")]
    Host(String),

    /// The search engine could not answer a request.
    #[error("Search error: {0}")]
    Search(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ThemeError {
    /// Creates a validation error for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<HostError> for ThemeError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::NotFound(msg) => Self::NotFound(msg),
            HostError::NotAuthorized(msg) => Self::NotAuthorized(msg),
            HostError::Other(msg) => Self::Host(msg),
        }
    }
}

/// Convenience type alias for [`std::result::Result`] with [`ThemeError`].
pub type Result<T> = std::result::Result<T, ThemeError>;
