//! Gateway error types

use thiserror::Error;

/// Gateway error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with something other than the documented shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Operation requires a signed-in identity
    #[error("Authentication required")]
    Unauthorized,

    /// The signed-in identity may not touch this record
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Referenced record does not exist (or no longer exists)
    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// The store rejected the payload
    #[error("Validation error: {0}")]
    Validation(String),

    /// Anything else the store reports
    #[error("Record store error: {0}")]
    Internal(String),

    /// Record (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        ClientError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    /// True when the failure means "this record is gone", as opposed to a
    /// transport or auth problem. Callers doing best-effort resolution
    /// treat both the same, but logging distinguishes them.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

/// Result type for gateway operations
pub type ClientResult<T> = Result<T, ClientError>;
