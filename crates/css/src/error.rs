//! Value tokenizer error types

use std::fmt;
use thiserror::Error;

/// Tokenizer result type
pub type CssResult<T> = Result<T, CssError>;

/// Source location inside a value string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from start
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised while splitting a value into component values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CssError {
    #[error("Unterminated string at {location}")]
    UnterminatedString {
        /// Where the string started
        location: SourceLocation,
    },

    #[error("Invalid url: {reason} at {location}")]
    InvalidUrl {
        reason: &'static str,
        /// Where the url token started
        location: SourceLocation,
    },

    #[error("Invalid number '{number}' at {location}")]
    InvalidNumber {
        number: String,
        location: SourceLocation,
    },
}

impl CssError {
    /// Get the source location of this error
    pub fn location(&self) -> SourceLocation {
        match self {
            Self::UnterminatedString { location } => *location,
            Self::InvalidUrl { location, .. } => *location,
            Self::InvalidNumber { location, .. } => *location,
        }
    }

    pub fn invalid_url(reason: &'static str, location: SourceLocation) -> Self {
        Self::InvalidUrl { reason, location }
    }
}
