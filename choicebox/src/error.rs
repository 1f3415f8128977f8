//! Error types surfaced to the embedding application.
//!
//! Normal misuse (selecting a disabled option, toggling past the selection
//! cap, picking an out-of-range date) is modeled as a no-op, not an error.
//! Only loader and creation failures are reported, and only through these
//! types; widget handlers never panic.

use thiserror::Error;

/// Error type for async option loading failures
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LoadError {
    /// Error message
    pub message: String,
}

impl LoadError {
    /// Create a new load error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<String> for LoadError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for LoadError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Error type for option creation failures
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CreateError {
    /// Error message
    pub message: String,
}

impl CreateError {
    /// Create a new creation error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for CreateError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for CreateError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
