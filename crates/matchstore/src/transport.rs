//! Transport seams for the persistence client.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::request::StoreRequest;

/// Primary transport: executes requests using its own session handling.
///
/// Implementations range from the production REST client to the in-memory
/// test double. This trait is object-safe and used as `Arc<dyn StoreTransport>`.
#[async_trait]
pub trait StoreTransport: Send + Sync {
    /// Execute one request, returning the affected or selected rows.
    async fn execute(&self, request: &StoreRequest) -> Result<Vec<Value>>;

    /// Human-readable transport name for logging.
    fn name(&self) -> &str;
}

/// Secondary transport invoked only after the primary exhausts its retries.
///
/// A fallback cannot rely on the primary's internal session handling, so the
/// caller hands it the auth token explicitly on every call. The token comes
/// from in-memory session state - never from a network round trip on this
/// path.
#[async_trait]
pub trait FallbackTransport: Send + Sync {
    /// Execute one request with an explicitly provided bearer token.
    async fn execute_with_token(&self, request: &StoreRequest, token: &str) -> Result<Vec<Value>>;

    /// Human-readable transport name for logging.
    fn name(&self) -> &str;
}
