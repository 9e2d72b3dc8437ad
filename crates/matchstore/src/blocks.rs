//! Block record operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::StoreClient;
use crate::error::{Result, StoreError};
use crate::request::{Filter, StoreRequest};

const COLLECTION: &str = "blocks";

/// One user blocking another. Unique per (blocker, blocked).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub blocker_id: String,
    pub blocked_id: String,
    pub created_at: DateTime<Utc>,
}

/// Record a block, tolerating duplicates.
pub async fn block_user(client: &StoreClient, blocker_id: &str, blocked_id: &str) -> Result<()> {
    let record = BlockRecord {
        blocker_id: blocker_id.to_string(),
        blocked_id: blocked_id.to_string(),
        created_at: Utc::now(),
    };
    match client.insert(COLLECTION, &[record]).await {
        Ok(()) | Err(StoreError::Conflict(_)) => Ok(()),
        Err(err) => Err(err),
    }
}

/// Ids blocked in either direction from this user's point of view. Blocked
/// users must never see each other in feeds, whichever side blocked.
pub async fn blocked_ids(client: &StoreClient, user_id: &str) -> Result<Vec<String>> {
    let outgoing: Vec<BlockRecord> = client
        .fetch(&StoreRequest::select(
            COLLECTION,
            vec![Filter::eq("blocker_id", json!(user_id))],
        ))
        .await?;
    let incoming: Vec<BlockRecord> = client
        .fetch(&StoreRequest::select(
            COLLECTION,
            vec![Filter::eq("blocked_id", json!(user_id))],
        ))
        .await?;

    Ok(outgoing
        .into_iter()
        .map(|b| b.blocked_id)
        .chain(incoming.into_iter().map(|b| b.blocker_id))
        .collect())
}
