//! Swipe record operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::client::StoreClient;
use crate::error::{Result, StoreError};
use crate::request::{Filter, StoreRequest};

const COLLECTION: &str = "swipes";

/// Swipe action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeKind {
    Like,
    Pass,
}

/// A recorded swipe. Unique per (actor, target, kind).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeRecord {
    pub actor_id: String,
    pub target_id: String,
    pub kind: SwipeKind,
    pub created_at: DateTime<Utc>,
}

/// Record a swipe. Duplicate swipes are absorbed as a no-op success:
/// returns `true` when a new record was written, `false` when it already
/// existed.
pub async fn record_swipe(
    client: &StoreClient,
    actor_id: &str,
    target_id: &str,
    kind: SwipeKind,
) -> Result<bool> {
    let record = SwipeRecord {
        actor_id: actor_id.to_string(),
        target_id: target_id.to_string(),
        kind,
        created_at: Utc::now(),
    };
    match client.insert(COLLECTION, &[record]).await {
        Ok(()) => Ok(true),
        Err(StoreError::Conflict(_)) => {
            debug!(actor_id, target_id, ?kind, "duplicate swipe absorbed");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Delete a swipe record (undo). Returns whether a record existed.
pub async fn delete_swipe(
    client: &StoreClient,
    actor_id: &str,
    target_id: &str,
    kind: SwipeKind,
) -> Result<bool> {
    let removed = client
        .delete(&StoreRequest::delete(
            COLLECTION,
            vec![
                Filter::eq("actor_id", json!(actor_id)),
                Filter::eq("target_id", json!(target_id)),
                Filter::eq("kind", serde_json::to_value(kind)?),
            ],
        ))
        .await?;
    Ok(removed > 0)
}

/// Atomic existence check for a reciprocal like from `target` back to
/// `actor`.
pub async fn exists_mutual_like(
    client: &StoreClient,
    actor_id: &str,
    target_id: &str,
) -> Result<bool> {
    let rows = client
        .execute(
            &StoreRequest::select(
                COLLECTION,
                vec![
                    Filter::eq("actor_id", json!(target_id)),
                    Filter::eq("target_id", json!(actor_id)),
                    Filter::eq("kind", json!("like")),
                ],
            )
            .page(1, 0),
        )
        .await?;
    Ok(!rows.is_empty())
}

/// All user ids this actor has already liked or passed on.
pub async fn swiped_target_ids(client: &StoreClient, actor_id: &str) -> Result<Vec<String>> {
    let rows: Vec<SwipeRecord> = client
        .fetch(&StoreRequest::select(
            COLLECTION,
            vec![Filter::eq("actor_id", json!(actor_id))],
        ))
        .await?;
    Ok(rows.into_iter().map(|swipe| swipe.target_id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;
    use crate::session::SessionContext;
    use std::sync::Arc;

    fn client() -> StoreClient {
        StoreClient::new(
            Arc::new(MemoryTransport::new()),
            Arc::new(SessionContext::new("test")),
        )
    }

    #[tokio::test]
    async fn test_duplicate_swipe_absorbed() {
        let client = client();
        assert!(record_swipe(&client, "a", "b", SwipeKind::Like).await.unwrap());
        assert!(!record_swipe(&client, "a", "b", SwipeKind::Like).await.unwrap());
    }

    #[tokio::test]
    async fn test_mutual_like_detection() {
        let client = client();
        record_swipe(&client, "a", "b", SwipeKind::Like).await.unwrap();
        assert!(!exists_mutual_like(&client, "a", "b").await.unwrap());

        record_swipe(&client, "b", "a", SwipeKind::Like).await.unwrap();
        assert!(exists_mutual_like(&client, "a", "b").await.unwrap());
    }

    #[tokio::test]
    async fn test_pass_is_not_a_like() {
        let client = client();
        record_swipe(&client, "b", "a", SwipeKind::Pass).await.unwrap();
        assert!(!exists_mutual_like(&client, "a", "b").await.unwrap());
    }

    #[tokio::test]
    async fn test_undo_then_reswipe() {
        let client = client();
        assert!(record_swipe(&client, "a", "b", SwipeKind::Like).await.unwrap());
        assert!(delete_swipe(&client, "a", "b", SwipeKind::Like).await.unwrap());
        // Undo of an absent record reports false rather than erroring.
        assert!(!delete_swipe(&client, "a", "b", SwipeKind::Like).await.unwrap());
        assert!(record_swipe(&client, "a", "b", SwipeKind::Like).await.unwrap());

        let targets = swiped_target_ids(&client, "a").await.unwrap();
        assert_eq!(targets, vec!["b".to_string()]);
    }
}
