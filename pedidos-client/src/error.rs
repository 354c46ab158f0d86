//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Session missing, invalid or expired
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (caller-correctable, nothing was applied)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wrong state for the requested transition
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Business rule violation (insufficient stock)
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Server-side failure; for issuance this can mean side effects were
    /// partially applied - inspect the message before retrying
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
