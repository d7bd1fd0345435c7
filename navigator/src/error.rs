//! Error type for registry and console operations.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum NavigatorError {
    /// A route with this identifier is already registered.
    DuplicateRoute(String),
    /// No route with this identifier is registered.
    UnknownRoute(String),
    /// Console input that could not be parsed or is out of range.
    InvalidInput { field: &'static str, input: String },
    Io(io::Error),
}

impl NavigatorError {
    pub(crate) fn invalid(field: &'static str, input: impl Into<String>) -> Self {
        NavigatorError::InvalidInput {
            field,
            input: input.into(),
        }
    }
}

impl From<io::Error> for NavigatorError {
    fn from(e: io::Error) -> Self {
        NavigatorError::Io(e)
    }
}

impl fmt::Display for NavigatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigatorError::DuplicateRoute(id) => write!(f, "route '{}' already exists", id),
            NavigatorError::UnknownRoute(id) => write!(f, "no route with id '{}'", id),
            NavigatorError::InvalidInput { field, input } => {
                write!(f, "invalid {}: '{}'", field, input)
            }
            NavigatorError::Io(e) => write!(f, "console I/O error: {}", e),
        }
    }
}

impl std::error::Error for NavigatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigatorError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for navigator operations.
pub type Result<T> = std::result::Result<T, NavigatorError>;
