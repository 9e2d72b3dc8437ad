//! Match record operations.

use chrono::{DateTime, Utc};
use match_core::CompatibilityScore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::client::StoreClient;
use crate::error::{Result, StoreError};
use crate::request::{Filter, OrderBy, StoreRequest};

const COLLECTION: &str = "matches";

/// Canonical key for an unordered user pair: lower id first.
///
/// Guarantees both like orders map to the same match row, which is what the
/// store's uniqueness constraint hangs off.
pub fn pair_key(a: &str, b: &str) -> (String, String, String) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (lo.to_string(), hi.to_string(), format!("{lo}:{hi}"))
}

/// A created match with its frozen score snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    /// Canonically lower user id.
    pub user_a: String,
    /// Canonically higher user id.
    pub user_b: String,
    pub pair_key: String,
    /// Compatibility breakdown frozen at match time.
    pub score: CompatibilityScore,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Build a new record for the unordered pair with a fresh id.
    pub fn new(a: &str, b: &str, score: CompatibilityScore) -> Self {
        let (user_a, user_b, pair_key) = pair_key(a, b);
        Self {
            id: Uuid::new_v4().to_string(),
            user_a,
            user_b,
            pair_key,
            score,
            created_at: Utc::now(),
        }
    }

    /// The other member of the pair, from one member's point of view.
    pub fn other_user(&self, user_id: &str) -> &str {
        if self.user_a == user_id {
            &self.user_b
        } else {
            &self.user_a
        }
    }
}

/// Outcome of a conflict-tolerant match insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    /// Another writer won the race; the pair key already exists.
    AlreadyExists,
}

/// Insert a match row. A pair-key conflict means the other side of a
/// near-simultaneous mutual like got there first - that is a success, not
/// an error.
pub async fn insert_match(client: &StoreClient, record: &MatchRecord) -> Result<InsertOutcome> {
    match client.insert(COLLECTION, std::slice::from_ref(record)).await {
        Ok(()) => Ok(InsertOutcome::Created),
        Err(StoreError::Conflict(_)) => {
            debug!(pair_key = %record.pair_key, "match already exists for pair");
            Ok(InsertOutcome::AlreadyExists)
        }
        Err(err) => Err(err),
    }
}

/// Look up the match for an unordered pair, if any.
pub async fn find_by_pair(client: &StoreClient, a: &str, b: &str) -> Result<Option<MatchRecord>> {
    let (_, _, key) = pair_key(a, b);
    client
        .fetch_optional(&StoreRequest::select(
            COLLECTION,
            vec![Filter::eq("pair_key", json!(key))],
        ))
        .await
}

/// All matches involving a user, newest first.
pub async fn matches_for_user(client: &StoreClient, user_id: &str) -> Result<Vec<MatchRecord>> {
    // The pair is stored canonically ordered, so the user may be on either
    // side; two indexed reads and a merge.
    let as_a: Vec<MatchRecord> = client
        .fetch(
            &StoreRequest::select(COLLECTION, vec![Filter::eq("user_a", json!(user_id))])
                .order(OrderBy::descending("created_at")),
        )
        .await?;
    let as_b: Vec<MatchRecord> = client
        .fetch(
            &StoreRequest::select(COLLECTION, vec![Filter::eq("user_b", json!(user_id))])
                .order(OrderBy::descending("created_at")),
        )
        .await?;

    let mut all: Vec<MatchRecord> = as_a.into_iter().chain(as_b).collect();
    all.sort_by(|x, y| y.created_at.cmp(&x.created_at).then(x.id.cmp(&y.id)));
    Ok(all)
}
