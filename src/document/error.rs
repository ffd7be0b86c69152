//! Errors that abort a parse.
//!
//! They never leave the parser as values: `parse` reports them through the
//! log sink and returns `None`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed XML or JSON.
    Syntax { message: String },
    /// A top-level XML element in a namespace no module uses (strict mode
    /// only).
    UnknownNamespace { namespace: String },
    /// A JSON member qualified with a module name that is not loaded (strict
    /// mode only).
    UnknownModule { name: String },
    /// Element not in the schema (strict mode only).
    UnknownElement { path: String },
    /// The encoding does not match the schema node kind.
    KindMismatch { path: String, expected: String },
    InvalidValue { path: String, message: String },
    /// A second instance of a single-instance node, or of a list entry or
    /// leaf-list value.
    Duplicate { path: String },
    MissingKey { path: String, key: String },
    /// State data in a configuration-only mode.
    StateData { path: String },
}

impl ParseError {
    /// Data path the error refers to, when there is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            ParseError::Syntax { .. }
            | ParseError::UnknownNamespace { .. }
            | ParseError::UnknownModule { .. } => None,
            ParseError::UnknownElement { path }
            | ParseError::KindMismatch { path, .. }
            | ParseError::InvalidValue { path, .. }
            | ParseError::Duplicate { path }
            | ParseError::MissingKey { path, .. }
            | ParseError::StateData { path } => Some(path.as_str()),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax { message } => write!(f, "Syntax error: {}", message),
            ParseError::UnknownNamespace { namespace } => {
                write!(f, "No module with namespace '{}'", namespace)
            }
            ParseError::UnknownModule { name } => write!(f, "Module '{}' is not loaded", name),
            ParseError::UnknownElement { path } => write!(f, "Unknown element '{}'", path),
            ParseError::KindMismatch { path, expected } => {
                write!(f, "Invalid encoding of '{}', expected {}", path, expected)
            }
            ParseError::InvalidValue { path, message } => {
                write!(f, "Invalid value of '{}': {}", path, message)
            }
            ParseError::Duplicate { path } => write!(f, "Duplicate instance of '{}'", path),
            ParseError::MissingKey { path, key } => {
                write!(f, "List instance '{}' is missing key '{}'", path, key)
            }
            ParseError::StateData { path } => {
                write!(f, "State data '{}' is not allowed in configuration", path)
            }
        }
    }
}

impl std::error::Error for ParseError {}
