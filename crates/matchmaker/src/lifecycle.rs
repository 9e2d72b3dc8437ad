//! Swipe and match lifecycle.

use match_core::score_pair;
use matchstore::matches::{self, InsertOutcome, MatchRecord};
use matchstore::profiles;
use matchstore::swipes::{self, SwipeKind};
use serde_json::json;
use tracing::{info, warn};

use crate::engine::Matchmaker;
use crate::error::MatchmakerError;

/// Result of a like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeOutcome {
    NoMatch,
    /// The like was reciprocal; here is the match, whether this call
    /// created it or a racing one did.
    Matched(MatchRecord),
}

impl Matchmaker {
    /// Record a like and resolve the match if it is mutual.
    ///
    /// The score snapshot is computed here, server-side, from both stored
    /// profiles; callers never supply scores. A pair-key conflict on the
    /// match insert means the reciprocal like's handler won the race, so
    /// the existing match is looked up and returned. Duplicate likes are
    /// absorbed.
    pub async fn like(&self, actor_id: &str, target_id: &str) -> Result<SwipeOutcome, MatchmakerError> {
        if actor_id == target_id {
            return Err(MatchmakerError::Validation(
                "cannot swipe on yourself".to_string(),
            ));
        }

        swipes::record_swipe(&self.store, actor_id, target_id, SwipeKind::Like).await?;

        if !swipes::exists_mutual_like(&self.store, actor_id, target_id).await? {
            return Ok(SwipeOutcome::NoMatch);
        }

        let actor = profiles::get_profile(&self.store, actor_id).await?;
        let target = profiles::get_profile(&self.store, target_id).await?;
        let score = score_pair(&actor, &target);

        let record = MatchRecord::new(actor_id, target_id, score);
        let record = match matches::insert_match(&self.store, &record).await? {
            InsertOutcome::Created => {
                info!(pair_key = %record.pair_key, overall = record.score.overall, "match created");
                self.notify_matched(&record, actor_id).await;
                record
            }
            InsertOutcome::AlreadyExists => matches::find_by_pair(&self.store, actor_id, target_id)
                .await?
                .ok_or_else(|| matchstore::StoreError::NotFound {
                    entity: "match",
                    id: matches::pair_key(actor_id, target_id).2,
                })?,
        };

        Ok(SwipeOutcome::Matched(record))
    }

    /// Record a pass. Never produces a match; duplicates are absorbed.
    pub async fn pass(&self, actor_id: &str, target_id: &str) -> Result<(), MatchmakerError> {
        if actor_id == target_id {
            return Err(MatchmakerError::Validation(
                "cannot swipe on yourself".to_string(),
            ));
        }
        swipes::record_swipe(&self.store, actor_id, target_id, SwipeKind::Pass).await?;
        Ok(())
    }

    /// Undo a swipe. Removing an absent record is a quiet no-op, so
    /// like, undo, like again always works.
    pub async fn undo(
        &self,
        actor_id: &str,
        target_id: &str,
        kind: SwipeKind,
    ) -> Result<(), MatchmakerError> {
        swipes::delete_swipe(&self.store, actor_id, target_id, kind).await?;
        Ok(())
    }

    /// All matches for a user, newest first.
    pub async fn matches_for(&self, user_id: &str) -> Result<Vec<MatchRecord>, MatchmakerError> {
        Ok(matches::matches_for_user(&self.store, user_id).await?)
    }

    /// Fire-and-forget `match.created` notification to the other party.
    /// Delivery failure is logged and never propagated.
    async fn notify_matched(&self, record: &MatchRecord, actor_id: &str) {
        let other = record.other_user(actor_id);
        let payload = json!({
            "match_id": record.id,
            "with_user": actor_id,
            "overall": record.score.overall,
        });
        if let Err(err) = self.notifier.notify(other, "match.created", payload).await {
            warn!(match_id = %record.id, error = %err, "match notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchmakerConfig;
    use crate::notify::{Notifier, NotifyError};
    use async_trait::async_trait;
    use chrono::Utc;
    use match_core::{Gender, Lifestyle, PersonalityTraits, UserProfile};
    use matchstore::memory::MemoryTransport;
    use matchstore::session::SessionContext;
    use matchstore::StoreClient;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, user_id: &str, kind: &str, _payload: Value) -> Result<(), NotifyError> {
            self.sent
                .lock()
                .unwrap()
                .push((user_id.to_string(), kind.to_string()));
            Ok(())
        }
    }

    fn profile(id: &str, gender: Gender, interested_in: Vec<Gender>) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            display_name: id.to_string(),
            age: 30,
            gender,
            interested_in,
            location: None,
            lifestyle: Lifestyle::default(),
            personality: Some(PersonalityTraits {
                openness: 60.0,
                conscientiousness: 60.0,
                extraversion: 60.0,
                agreeableness: 60.0,
                neuroticism: 60.0,
            }),
            interests: vec!["hiking".to_string()],
            values: Vec::new(),
            last_active: Utc::now(),
            onboarding_complete: true,
        }
    }

    async fn seeded_engine(transport: MemoryTransport) -> (Matchmaker, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = Matchmaker::new(
            StoreClient::new(Arc::new(transport), Arc::new(SessionContext::new("test"))),
            MatchmakerConfig::default(),
        )
        .with_notifier(notifier.clone());

        let a = profile("alice", Gender::Woman, vec![Gender::Man]);
        let b = profile("bob", Gender::Man, vec![Gender::Woman]);
        profiles::upsert_profile(engine.store(), &a).await.unwrap();
        profiles::upsert_profile(engine.store(), &b).await.unwrap();
        (engine, notifier)
    }

    #[tokio::test]
    async fn test_one_sided_like_is_no_match() {
        let (engine, notifier) = seeded_engine(MemoryTransport::new()).await;
        let outcome = engine.like("alice", "bob").await.unwrap();
        assert_eq!(outcome, SwipeOutcome::NoMatch);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutual_like_creates_match_and_notifies() {
        let (engine, notifier) = seeded_engine(MemoryTransport::new()).await;
        engine.like("alice", "bob").await.unwrap();
        let outcome = engine.like("bob", "alice").await.unwrap();

        let record = match outcome {
            SwipeOutcome::Matched(record) => record,
            SwipeOutcome::NoMatch => panic!("expected a match"),
        };
        assert_eq!(record.pair_key, "alice:bob");
        // Identical traits: perfect personality similarity.
        assert_eq!(record.score.personality, 100);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.as_slice(), &[("alice".to_string(), "match.created".to_string())]);
    }

    #[tokio::test]
    async fn test_self_swipe_rejected() {
        let (engine, _) = seeded_engine(MemoryTransport::new()).await;
        assert!(matches!(
            engine.like("alice", "alice").await,
            Err(MatchmakerError::Validation(_))
        ));
        assert!(matches!(
            engine.pass("alice", "alice").await,
            Err(MatchmakerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_pass_never_matches() {
        let (engine, _) = seeded_engine(MemoryTransport::new()).await;
        engine.like("alice", "bob").await.unwrap();
        engine.pass("bob", "alice").await.unwrap();
        assert!(engine.matches_for("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_like_undo_like() {
        let (engine, _) = seeded_engine(MemoryTransport::new()).await;
        engine.like("alice", "bob").await.unwrap();
        engine.undo("alice", "bob", SwipeKind::Like).await.unwrap();
        // Undo again: absent record, still fine.
        engine.undo("alice", "bob", SwipeKind::Like).await.unwrap();
        engine.like("alice", "bob").await.unwrap();

        let targets = swipes::swiped_target_ids(engine.store(), "alice")
            .await
            .unwrap();
        assert_eq!(targets, vec!["bob".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_mutual_likes_yield_one_match() {
        let transport = MemoryTransport::new();
        let (engine, _) = seeded_engine(transport.clone()).await;

        let (from_alice, from_bob) =
            tokio::join!(engine.like("alice", "bob"), engine.like("bob", "alice"));
        let from_alice = from_alice.unwrap();
        let from_bob = from_bob.unwrap();

        // At least one side must observe the match, and the store holds
        // exactly one row for the pair.
        assert!(matches!(from_alice, SwipeOutcome::Matched(_))
            || matches!(from_bob, SwipeOutcome::Matched(_)));
        assert_eq!(transport.rows("matches").len(), 1);

        // Both sides resolve to the same match id afterwards.
        let found = matches::find_by_pair(engine.store(), "bob", "alice")
            .await
            .unwrap()
            .unwrap();
        for outcome in [from_alice, from_bob] {
            if let SwipeOutcome::Matched(record) = outcome {
                assert_eq!(record.id, found.id);
            }
        }
    }

    #[tokio::test]
    async fn test_duplicate_like_after_match_returns_same_match() {
        let (engine, notifier) = seeded_engine(MemoryTransport::new()).await;
        engine.like("alice", "bob").await.unwrap();
        let first = engine.like("bob", "alice").await.unwrap();
        let again = engine.like("bob", "alice").await.unwrap();
        assert_eq!(first, again);
        // Only the creating call notifies.
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }
}
