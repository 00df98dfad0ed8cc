//! services/api/src/error.rs
//!
//! The error type the service binaries return. Request-level failures never
//! reach it: handlers answer with an HTTP status, and agent failures degrade
//! to fallback content inside the handler. What can still fail is startup.

use crate::config::ConfigError;

/// Errors that stop the `api` binary before or while it starts listening.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("configuration failed: {0}")]
    Config(#[from] ConfigError),

    /// Socket binding and the other I/O around bringing the server up.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}
