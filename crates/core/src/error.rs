//! Error types for SkipScan
//!
//! This module defines the error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Scans, appends and shortcut lookups never fail. The only fallible entry
//! points are building a query from text and loading a configuration.

use thiserror::Error;

/// Result type alias for SkipScan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SkipScan
#[derive(Debug, Error)]
pub enum Error {
    /// Query text could not be parsed
    #[error("Query parse error: {0}")]
    QueryParse(#[from] QueryParseError),

    /// Configuration is malformed or out of range
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

/// Errors produced while parsing query text
///
/// Positions are byte offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryParseError {
    /// Input ended where a tag, `!` or `(` was expected
    #[error("unexpected end of query")]
    UnexpectedEnd,

    /// A character that cannot start or continue a query
    #[error("unexpected character {found:?} at offset {pos}")]
    UnexpectedChar {
        /// Byte offset of the character
        pos: usize,
        /// The character found
        found: char,
    },

    /// A quoted tag without its closing quote
    #[error("unterminated quoted tag starting at offset {pos}")]
    UnterminatedTag {
        /// Byte offset of the opening quote
        pos: usize,
    },

    /// A quoted tag with nothing between the quotes
    #[error("empty tag at offset {pos}")]
    EmptyTag {
        /// Byte offset of the opening quote
        pos: usize,
    },

    /// A complete query followed by more input
    #[error("unexpected trailing input at offset {pos}")]
    TrailingInput {
        /// Byte offset where the trailing input starts
        pos: usize,
    },
}
