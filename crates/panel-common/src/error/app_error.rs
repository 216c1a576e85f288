//! Application error types
//!
//! Errors that stop the gateway process. Everything recoverable, including
//! a bad settings file, is logged and handled where it occurs.

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Listener errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    // Server loop errors
    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),
}

impl AppError {
    /// Create a bind error for an address
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    /// Get error code for log output
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Bind { .. } => "BIND_ERROR",
            Self::Server(_) => "SERVER_ERROR",
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
