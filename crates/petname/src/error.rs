//! Error types for the petname crate

use thiserror::Error;

/// Errors raised while loading word lists
///
/// These only occur when the generator is built. A generator that
/// exists can always produce a name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A word list has no usable entries
    #[error("word list '{list}' is empty")]
    Exhausted { list: &'static str },

    /// A word list entry is not a lower-case ASCII word
    #[error("word list '{list}' has invalid entry {word:?} on line {line}")]
    InvalidWord {
        list: &'static str,
        word: String,
        line: usize,
    },
}

/// Result type for petname operations
pub type Result<T> = std::result::Result<T, Error>;
