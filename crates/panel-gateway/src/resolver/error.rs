//! Resolver error types
//!
//! These never reach the transport. Every variant is rendered into the
//! reply payload for the message that caused it.

use thiserror::Error;

/// Resolver error type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Message could not be decoded into a command
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// No handler registered under this name
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Handler rejected the command data
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Handler failed internally
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResolveError {
    /// Get error code for reply payloads
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::UnknownCommand(_) => "UNKNOWN_COMMAND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create an invalid payload error
    #[must_use]
    pub fn invalid_payload(msg: impl std::fmt::Display) -> Self {
        Self::InvalidPayload(msg.to_string())
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(msg: impl std::fmt::Display) -> Self {
        Self::InvalidArgument(msg.to_string())
    }

    /// Create an internal error from any error
    #[must_use]
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Resolver result type
pub type ResolveResult<T> = Result<T, ResolveError>;
