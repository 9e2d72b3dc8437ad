//! Exclusion set for the discovery feed.
//!
//! Users already swiped on, matched with, or blocked (either direction) must
//! never reappear in the feed, and a user never sees themselves.

use std::collections::BTreeSet;

use matchstore::{blocks, matches, swipes, StoreClient};
use tracing::warn;

/// Ids excluded from a user's candidate pool. Always contains the user's
/// own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    ids: BTreeSet<String>,
}

impl ExclusionSet {
    /// Gather exclusions from the store with concurrent reads.
    ///
    /// A read failure degrades to a self-only set rather than failing the
    /// feed: a temporarily broader feed beats no feed, and duplicate swipes
    /// downstream are absorbed as no-ops anyway.
    pub async fn compute(store: &StoreClient, user_id: &str) -> Self {
        let (swiped, matched, blocked) = tokio::join!(
            swipes::swiped_target_ids(store, user_id),
            matches::matches_for_user(store, user_id),
            blocks::blocked_ids(store, user_id),
        );

        let mut ids = BTreeSet::new();
        ids.insert(user_id.to_string());

        match (swiped, matched, blocked) {
            (Ok(swiped), Ok(matched), Ok(blocked)) => {
                ids.extend(swiped);
                ids.extend(
                    matched
                        .iter()
                        .map(|m| m.other_user(user_id).to_string()),
                );
                ids.extend(blocked);
            }
            (swiped, matched, blocked) => {
                let failed = [
                    swiped.err().map(|e| ("swipes", e)),
                    matched.err().map(|e| ("matches", e)),
                    blocked.err().map(|e| ("blocks", e)),
                ];
                for (source, err) in failed.into_iter().flatten() {
                    warn!(user_id, source, error = %err, "exclusion read failed, degrading to self-only");
                }
                ids.clear();
                ids.insert(user_id.to_string());
            }
        }

        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Ids in deterministic order, for the store-side `not in` filter.
    pub fn into_ids(self) -> Vec<String> {
        self.ids.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_core::CompatibilityScore;
    use matchstore::memory::MemoryTransport;
    use matchstore::session::SessionContext;
    use matchstore::matches::MatchRecord;
    use matchstore::swipes::SwipeKind;
    use matchstore::StoreError;
    use std::sync::Arc;

    fn store(transport: MemoryTransport) -> StoreClient {
        StoreClient::new(Arc::new(transport), Arc::new(SessionContext::new("test")))
    }

    fn score() -> CompatibilityScore {
        CompatibilityScore {
            personality: 80,
            interests: 40,
            lifestyle: 90,
            overall: 72,
            reasons: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_all_sources_collected() {
        let transport = MemoryTransport::new();
        let store = store(transport);

        swipes::record_swipe(&store, "me", "liked", SwipeKind::Like)
            .await
            .unwrap();
        swipes::record_swipe(&store, "me", "passed", SwipeKind::Pass)
            .await
            .unwrap();
        matches::insert_match(&store, &MatchRecord::new("me", "matched", score()))
            .await
            .unwrap();
        blocks::block_user(&store, "me", "i-blocked").await.unwrap();
        blocks::block_user(&store, "blocked-me", "me").await.unwrap();

        let set = ExclusionSet::compute(&store, "me").await;
        for id in ["me", "liked", "passed", "matched", "i-blocked", "blocked-me"] {
            assert!(set.contains(id), "missing {id}");
        }
        assert!(!set.contains("stranger"));
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_self_only() {
        let transport = MemoryTransport::new();
        let store = store(transport.clone());

        swipes::record_swipe(&store, "me", "liked", SwipeKind::Like)
            .await
            .unwrap();
        // Non-retryable so the retry layer surfaces it on the first read.
        transport.push_failure(StoreError::Validation("boom".to_string()));

        let set = ExclusionSet::compute(&store, "me").await;
        assert_eq!(set.into_ids(), vec!["me".to_string()]);
    }
}
