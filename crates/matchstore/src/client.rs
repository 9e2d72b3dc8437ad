//! The store client: retry, fallback, and typed row access.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{Result, StoreError};
use crate::request::StoreRequest;
use crate::retry::{with_retry, with_retry_and_fallback, RetryPolicy};
use crate::session::{SessionContext, TokenProvider};
use crate::transport::{FallbackTransport, StoreTransport};

/// Resilient client over a primary transport and an optional fallback.
///
/// Every operation is wrapped with per-attempt timeout, classification-aware
/// retry, and - when configured - a single fallback invocation after the
/// primary exhausts its budget. The client holds no cross-call state beyond
/// the transports themselves; each call is independently authenticated.
#[derive(Clone)]
pub struct StoreClient {
    primary: Arc<dyn StoreTransport>,
    fallback: Option<Arc<dyn FallbackTransport>>,
    session: Arc<SessionContext>,
    policy: RetryPolicy,
}

impl StoreClient {
    pub fn new(primary: Arc<dyn StoreTransport>, session: Arc<SessionContext>) -> Self {
        Self {
            primary,
            fallback: None,
            session,
            policy: RetryPolicy::default(),
        }
    }

    /// Attach the fallback transport.
    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackTransport>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Override the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute a request through the full retry-and-fallback pipeline.
    pub async fn execute(&self, request: &StoreRequest) -> Result<Vec<Value>> {
        let primary = &self.primary;
        match &self.fallback {
            None => with_retry(&self.policy, || primary.execute(request)).await,
            Some(fallback) => {
                with_retry_and_fallback(
                    &self.policy,
                    || primary.execute(request),
                    || async {
                        // The fallback cannot use the primary's session
                        // handling; hand it the in-memory token explicitly.
                        let token = self.session.access_token().ok_or_else(|| {
                            StoreError::Auth("no session token available for fallback".to_string())
                        })?;
                        warn!(
                            transport = fallback.name(),
                            collection = %request.collection,
                            "primary exhausted, using fallback transport"
                        );
                        fallback.execute_with_token(request, &token).await
                    },
                )
                .await
            }
        }
    }

    /// Execute a select and decode the rows.
    pub async fn fetch<T: DeserializeOwned>(&self, request: &StoreRequest) -> Result<Vec<T>> {
        let rows = self.execute(request).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    /// Execute a select expecting at most one row.
    pub async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: &StoreRequest,
    ) -> Result<Option<T>> {
        Ok(self.fetch(request).await?.into_iter().next())
    }

    /// Insert typed rows.
    pub async fn insert<T: Serialize>(&self, collection: &str, rows: &[T]) -> Result<()> {
        let rows = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.execute(&StoreRequest::insert(collection, rows)).await?;
        Ok(())
    }

    /// Upsert typed rows on the given conflict target.
    pub async fn upsert<T: Serialize>(
        &self,
        collection: &str,
        rows: &[T],
        conflict_target: &[&str],
    ) -> Result<()> {
        let rows = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let target = conflict_target.iter().map(|c| c.to_string()).collect();
        self.execute(&StoreRequest::upsert(collection, rows, target))
            .await?;
        Ok(())
    }

    /// Apply a partial patch to matching rows; returns how many were updated.
    pub async fn update(&self, request: &StoreRequest) -> Result<usize> {
        Ok(self.execute(request).await?.len())
    }

    /// Delete matching rows; returns how many were removed.
    pub async fn delete(&self, request: &StoreRequest) -> Result<usize> {
        Ok(self.execute(request).await?.len())
    }
}
