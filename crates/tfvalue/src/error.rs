//! Error types for the tfvalue crate

use crate::path::AttributePath;
use thiserror::Error;

/// Errors raised while converting between raw JSON and typed values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Raw or typed value shape disagrees with the type node
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    Mismatch {
        path: AttributePath,
        expected: String,
        found: String,
    },

    /// Object carries a key the type does not declare
    #[error("unexpected attribute {path}")]
    UnexpectedAttribute { path: AttributePath },

    /// Object is missing a key the type declares
    #[error("missing attribute {path}")]
    MissingAttribute { path: AttributePath },

    /// NaN and infinities have no JSON form
    #[error("number at {path} is not finite")]
    NonFiniteNumber { path: AttributePath },
}

impl CodecError {
    /// Location of the offending value
    pub fn path(&self) -> &AttributePath {
        match self {
            Self::Mismatch { path, .. }
            | Self::UnexpectedAttribute { path }
            | Self::MissingAttribute { path }
            | Self::NonFiniteNumber { path } => path,
        }
    }
}

/// Errors in a schema declaration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Attribute flags are not one of the allowed combinations
    #[error(
        "attribute {path} must be exactly one of required, optional, computed or optional+computed"
    )]
    InvalidFlags { path: AttributePath },

    /// Attribute name is empty or uses characters outside `[a-z0-9_]`
    #[error("invalid attribute name {name:?}")]
    InvalidName { name: String },

    /// Two attributes share a name within one object
    #[error("duplicate attribute {path}")]
    DuplicateAttribute { path: AttributePath },

    /// List nesting bounds are inverted
    #[error("nested attribute {path} has min_items {min} greater than max_items {max}")]
    InvalidItemBounds {
        path: AttributePath,
        min: usize,
        max: usize,
    },
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
