//! Error types
//!
//! Defines the error taxonomy for volume resolution.

use std::fmt;
use std::io;

/// Errors produced while resolving the removable volume path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The storage enumeration itself could not be performed
    ServiceUnavailable(String),
    /// Enumeration succeeded but no path could be determined
    NotFound,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::ServiceUnavailable(msg) => {
                write!(f, "Storage service unavailable: {}", msg)
            }
            ResolveError::NotFound => write!(f, "USB Path not available."),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<io::Error> for ResolveError {
    fn from(error: io::Error) -> Self {
        ResolveError::ServiceUnavailable(error.to_string())
    }
}
