//! Error types for the provider crate
//!
//! These are hard call failures: the caller misused the protocol or an
//! internal invariant broke. Problems with the values carried by a
//! well-formed request are reported as diagnostics instead.

use thiserror::Error;

/// Errors that abort a single lifecycle call
#[derive(Error, Debug)]
pub enum Error {
    /// No resource is registered under the requested type name
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    /// A second resource tried to register an existing type name
    #[error("resource type already registered: {0}")]
    DuplicateResourceType(String),

    /// A resource declared an invalid schema
    #[error("invalid schema for {type_name}: {source}")]
    InvalidSchema {
        type_name: String,
        #[source]
        source: tfvalue::SchemaError,
    },

    /// The request envelope itself is malformed
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// An internal invariant was violated while serving a call
    #[error("internal error in {type_name}: {message}")]
    Internal { type_name: String, message: String },

    /// Worker pool could not be created
    #[error("failed to create thread pool: {0}")]
    ThreadPool(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn internal(type_name: &str, message: impl Into<String>) -> Self {
        Self::Internal {
            type_name: type_name.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, Error>;
