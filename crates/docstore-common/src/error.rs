//! Error types for DocStore
//!
//! This module defines the common error taxonomy used throughout the
//! system. Each layer returns these kinds unchanged; only the HTTP
//! boundary turns them into status codes.

use thiserror::Error;

/// Common result type for DocStore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for DocStore
#[derive(Debug, Error)]
pub enum Error {
    // Validation errors (rejected locally, before any store call)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no fields to update")]
    NoFieldsToUpdate,

    // Domain errors
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    /// The store accepted the write but the post-condition never became
    /// observable within the retry budget.
    #[error("write to document {id} not visible after {attempts} read attempts")]
    VisibilityTimeout { id: String, attempts: u32 },

    // Network/transport errors talking to the store
    #[error("store request timeout")]
    Timeout,

    #[error("store connection failed: {0}")]
    ConnectionFailed(String),

    #[error("store unavailable: {0}")]
    ServiceUnavailable(String),

    // Internal errors
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a document-not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::DocumentNotFound(id.into())
    }

    /// Create a store-unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a transient store fault worth retrying
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::ServiceUnavailable(_) | Self::ConnectionFailed(_)
        )
    }

    /// Check if this is a not found error
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound(_))
    }

    /// Check if this is a caller error (never reaches the store)
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::NoFieldsToUpdate)
    }

    /// Stable error kind string, used in JSON error bodies
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::NoFieldsToUpdate => "NoFieldsToUpdate",
            Self::DocumentNotFound(_) => "DocumentNotFound",
            Self::VisibilityTimeout { .. } => "VisibilityTimeout",
            Self::Timeout => "Timeout",
            Self::ConnectionFailed(_) => "ConnectionFailed",
            Self::ServiceUnavailable(_) => "ServiceUnavailable",
            Self::Serialization(_) => "Serialization",
            Self::Configuration(_) => "Configuration",
            Self::Internal(_) => "Internal",
        }
    }

    /// Get the HTTP status code for the API boundary
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidArgument(_) | Self::NoFieldsToUpdate => 400,

            // 404 Not Found
            Self::DocumentNotFound(_) => 404,

            // 502 Bad Gateway (store transport faults)
            Self::Timeout | Self::ConnectionFailed(_) | Self::ServiceUnavailable(_) => 502,

            // 504 Gateway Timeout (write accepted, never observed)
            Self::VisibilityTimeout { .. } => 504,

            // 500 Internal Server Error
            Self::Serialization(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        assert!(Error::Timeout.is_retryable());
        assert!(Error::ServiceUnavailable("test".into()).is_retryable());
        assert!(!Error::DocumentNotFound("abc".into()).is_retryable());
        assert!(
            !Error::VisibilityTimeout {
                id: "abc".into(),
                attempts: 3
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_not_found() {
        assert!(Error::DocumentNotFound("abc".into()).is_not_found());
        assert!(!Error::Timeout.is_not_found());
    }

    #[test]
    fn test_error_validation() {
        assert!(Error::NoFieldsToUpdate.is_validation());
        assert!(Error::invalid_argument("empty id").is_validation());
        assert!(!Error::Timeout.is_validation());
    }

    #[test]
    fn test_error_http_status() {
        assert_eq!(Error::NoFieldsToUpdate.http_status_code(), 400);
        assert_eq!(Error::DocumentNotFound("abc".into()).http_status_code(), 404);
        assert_eq!(Error::Timeout.http_status_code(), 502);
        assert_eq!(
            Error::VisibilityTimeout {
                id: "abc".into(),
                attempts: 3
            }
            .http_status_code(),
            504
        );
        assert_eq!(Error::internal("test").http_status_code(), 500);
    }
}
