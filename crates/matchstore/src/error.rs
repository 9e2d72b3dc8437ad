//! Store error types and retry classification.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An attempt exceeded its hard timeout.
    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },

    /// Connection-level failure (reset, refused, DNS, etc.).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status not covered by a more specific variant.
    #[error("http status {status}: {message}")]
    Http { status: u16, message: String },

    /// Authentication or authorization failure.
    #[error("auth error: {0}")]
    Auth(String),

    /// Request rejected as invalid by the store.
    #[error("validation error: {0}")]
    Validation(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Uniqueness-constraint violation. Callers generally absorb this as a
    /// benign "already exists" outcome.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

/// Retry classification of a store error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient; safe to retry.
    Retryable,
    /// Terminal; retrying cannot help.
    NonRetryable,
    /// Not recognizably transient. Treated as non-retryable for safety.
    Unknown,
}

impl ErrorClass {
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorClass::Retryable)
    }
}

/// HTTP statuses treated as transient.
fn status_is_retryable(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

impl StoreError {
    /// Classify this error once, at the store boundary. Layers above must
    /// not re-classify.
    pub fn class(&self) -> ErrorClass {
        match self {
            StoreError::Timeout { .. } | StoreError::Network(_) => ErrorClass::Retryable,
            StoreError::Http { status, .. } => {
                if status_is_retryable(*status) {
                    ErrorClass::Retryable
                } else if (400..500).contains(status) {
                    ErrorClass::NonRetryable
                } else {
                    ErrorClass::Unknown
                }
            }
            StoreError::Auth(_)
            | StoreError::Validation(_)
            | StoreError::NotFound { .. }
            | StoreError::Conflict(_)
            | StoreError::Serde(_) => ErrorClass::NonRetryable,
        }
    }

    /// Map a reqwest transport failure into a store error.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout {
                after: Duration::ZERO,
            }
        } else {
            StoreError::Network(err.to_string())
        }
    }

    /// Map a non-success HTTP status into a store error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => StoreError::Auth(message),
            400 | 422 => StoreError::Validation(message),
            409 => StoreError::Conflict(message),
            _ => StoreError::Http { status, message },
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_and_network_are_retryable() {
        assert!(StoreError::Timeout { after: Duration::from_secs(8) }
            .class()
            .is_retryable());
        assert!(StoreError::Network("connection reset".into())
            .class()
            .is_retryable());
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [408, 429, 500, 502, 503, 504] {
            assert!(
                StoreError::Http { status, message: String::new() }
                    .class()
                    .is_retryable(),
                "status {status} should be retryable"
            );
        }
    }

    #[test]
    fn test_client_errors_are_non_retryable() {
        assert_eq!(
            StoreError::from_status(401, "bad token").class(),
            ErrorClass::NonRetryable
        );
        assert_eq!(
            StoreError::from_status(422, "bad payload").class(),
            ErrorClass::NonRetryable
        );
        assert_eq!(
            StoreError::Conflict("duplicate".into()).class(),
            ErrorClass::NonRetryable
        );
    }

    #[test]
    fn test_unknown_statuses_are_not_retried() {
        // 3xx is not recognizably transient; unknown must not retry.
        let err = StoreError::Http { status: 301, message: String::new() };
        assert_eq!(err.class(), ErrorClass::Unknown);
        assert!(!err.class().is_retryable());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(StoreError::from_status(409, "dup"), StoreError::Conflict(_)));
        assert!(matches!(StoreError::from_status(403, "no"), StoreError::Auth(_)));
        assert!(matches!(
            StoreError::from_status(500, "boom"),
            StoreError::Http { status: 500, .. }
        ));
    }
}
