//! Client Error Types
//!
//! Error taxonomy for a fact-check invocation. Only transport-level failures,
//! cancellation and invalid configuration cross the `check` boundary; parsing
//! conditions inside the stream are absorbed by the resolver.

use ittia_check_core::CoreError;
use serde::{Deserialize, Serialize};

/// Error types for fact-check operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckError {
    /// Connection failure or mid-stream network error
    NetworkError { message: String },
    /// The overall request timeout elapsed
    Timeout { message: String },
    /// Server error from the service
    ServerError {
        message: String,
        status: Option<u16>,
    },
    /// The service rejected the request (4xx)
    InvalidRequest {
        message: String,
        status: Option<u16>,
    },
    /// Endpoint not found
    NotFound { message: String },
    /// Rate limit exceeded
    RateLimited { message: String },
    /// The caller cancelled the check before a final stage arrived
    Cancelled,
    /// Invalid client configuration
    Config { message: String },
    /// Other error
    Other { message: String },
}

impl CheckError {
    /// Whether the failure came from the transport layer (connection, timeout, HTTP status).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CheckError::NetworkError { .. }
                | CheckError::Timeout { .. }
                | CheckError::ServerError { .. }
                | CheckError::InvalidRequest { .. }
                | CheckError::NotFound { .. }
                | CheckError::RateLimited { .. }
        )
    }
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::NetworkError { message } => write!(f, "Network error: {}", message),
            CheckError::Timeout { message } => write!(f, "Request timed out: {}", message),
            CheckError::ServerError { message, status } => {
                if let Some(s) = status {
                    write!(f, "Server error ({}): {}", s, message)
                } else {
                    write!(f, "Server error: {}", message)
                }
            }
            CheckError::InvalidRequest { message, status } => {
                if let Some(s) = status {
                    write!(f, "Invalid request ({}): {}", s, message)
                } else {
                    write!(f, "Invalid request: {}", message)
                }
            }
            CheckError::NotFound { message } => write!(f, "Not found: {}", message),
            CheckError::RateLimited { message } => write!(f, "Rate limited: {}", message),
            CheckError::Cancelled => write!(f, "Check cancelled"),
            CheckError::Config { message } => write!(f, "Configuration error: {}", message),
            CheckError::Other { message } => write!(f, "Error: {}", message),
        }
    }
}

impl std::error::Error for CheckError {}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CheckError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_builder() {
            CheckError::Config {
                message: err.to_string(),
            }
        } else {
            CheckError::NetworkError {
                message: err.to_string(),
            }
        }
    }
}

impl From<CoreError> for CheckError {
    fn from(err: CoreError) -> Self {
        CheckError::Config {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CheckError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::TimedOut {
            CheckError::Timeout {
                message: err.to_string(),
            }
        } else {
            CheckError::NetworkError {
                message: err.to_string(),
            }
        }
    }
}

/// Result type for fact-check operations
pub type CheckResult<T> = Result<T, CheckError>;
