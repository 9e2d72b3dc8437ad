//! Notification boundary.
//!
//! Delivery (push, in-app, whatever the product wires up) lives outside the
//! core. The engine only emits; a failed emission is logged and never fails
//! the operation that triggered it.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// Notification emission failure. Always swallowed by the engine.
#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Fire-and-forget notification emitter.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Emit one notification to a user.
    async fn notify(&self, user_id: &str, kind: &str, payload: Value) -> Result<(), NotifyError>;
}

/// Default notifier: logs the emission and does nothing else.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user_id: &str, kind: &str, payload: Value) -> Result<(), NotifyError> {
        info!(user_id, kind, %payload, "notification emitted");
        Ok(())
    }
}
