//! Error handling for lightcsv reading operations.
//!
//! Provides error types with line context for configuration problems,
//! malformed input and arity mismatches.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LightCsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Parse error on line {line}: {kind}: '{text}'")]
    Parse {
        line: usize,
        kind: ParseErrorKind,
        text: String,
    },

    #[error("Line {line} has {found} values, expected {expected}")]
    Arity {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Reason a line or token could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Unterminated quoted span, or text after a closing quote
    #[error("malformed quoting at column {column}")]
    MalformedQuoting { column: usize },

    /// No classifier recognized the token
    #[error("cannot classify value")]
    UnrecognizedToken,
}

impl LightCsvError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a parse error for malformed quoting in `raw_line`
    pub fn malformed_quoting(line: usize, column: usize, raw_line: impl Into<String>) -> Self {
        Self::Parse {
            line,
            kind: ParseErrorKind::MalformedQuoting { column },
            text: raw_line.into(),
        }
    }

    /// Create a parse error for a token no classifier recognized
    pub fn unrecognized_token(line: usize, token: impl Into<String>) -> Self {
        Self::Parse {
            line,
            kind: ParseErrorKind::UnrecognizedToken,
            text: token.into(),
        }
    }

    /// Create an arity error
    pub fn arity(line: usize, expected: usize, found: usize) -> Self {
        Self::Arity {
            line,
            expected,
            found,
        }
    }

    /// Line number the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } | Self::Arity { line, .. } => Some(*line),
            Self::Io(_) | Self::Configuration { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LightCsvError>;
