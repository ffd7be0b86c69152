//! Errors raised while parsing a path query.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Unexpected character at a byte offset of the query.
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// The query ended early.
    UnexpectedEnd { expected: String },
    InvalidSyntax { message: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnexpectedToken {
                position,
                found,
                expected,
            } => write!(
                f,
                "Unexpected token '{}' at position {}, expected {}",
                found, position, expected
            ),
            QueryError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of query, expected {}", expected)
            }
            QueryError::InvalidSyntax { message } => {
                write!(f, "Invalid path query: {}", message)
            }
        }
    }
}

impl std::error::Error for QueryError {}
