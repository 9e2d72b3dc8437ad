//! Error types for matchmaking operations.

use matchstore::StoreError;
use thiserror::Error;

/// Errors surfaced to callers of the matchmaking engine.
///
/// This is deliberately narrow: duplicate swipes and match-row conflicts are
/// absorbed below this boundary, and notification failures are logged and
/// swallowed. Only invalid input, incomplete profiles, and unresolved store
/// failures reach the caller.
#[derive(Debug, Error)]
pub enum MatchmakerError {
    /// Invalid caller input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requester's profile is not complete enough to score against.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A store operation failed after retries (and fallback, if configured).
    /// Already classified at the store boundary; not re-classified here.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for matchmaking operations.
pub type Result<T> = std::result::Result<T, MatchmakerError>;
