//! Error types for aliyun-dns
//!
//! The taxonomy is deliberately flat: input problems caught before any
//! subprocess runs, and everything that goes wrong while talking to the
//! provider.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for aliyun-dns
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input, rejected before the provider is contacted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Any provider failure: launch error, non-zero exit, stderr output
    /// or an unparseable response
    #[error("{0}")]
    OperationFailed(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an operation failure
    pub fn operation_failed(msg: impl Into<String>) -> Self {
        Self::OperationFailed(msg.into())
    }

    /// Whether this error was raised before any provider call
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::OperationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::OperationFailed(err.to_string())
    }
}
