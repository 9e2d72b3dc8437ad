//! Discovery feed construction.

use match_core::{
    check_dealbreakers, distance_between, score_pair, validation, CompatibilityScore, Distance,
    UserProfile, Verdict,
};
use matchstore::profiles::{self, CandidateQuery};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::Matchmaker;
use crate::error::MatchmakerError;
use crate::exclusions::ExclusionSet;

/// One ranked feed entry: the candidate, their score breakdown, and the
/// distance (if both sides shared coordinates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub profile: UserProfile,
    pub score: CompatibilityScore,
    pub distance: Distance,
}

impl Matchmaker {
    /// Build the ranked discovery feed for a user.
    ///
    /// Read-only: no write is issued anywhere in this path, so a cancelled
    /// request leaves no state behind. Repeated calls over unchanged data
    /// return the identical order; ties on the overall score break by
    /// last-active recency, then by candidate id.
    pub async fn build_feed(
        &self,
        user_id: &str,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<FeedEntry>, MatchmakerError> {
        let viewer = profiles::get_profile(&self.store, user_id).await?;
        if !viewer.onboarding_complete {
            return Err(MatchmakerError::InsufficientData(
                "onboarding is not complete".to_string(),
            ));
        }
        if viewer.personality.is_none() {
            return Err(MatchmakerError::InsufficientData(
                "personality assessment is missing".to_string(),
            ));
        }

        let limit = limit
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size);
        let exclusions = ExclusionSet::compute(&self.store, user_id).await;

        let min_age = viewer
            .age
            .saturating_sub(self.config.age_band_years)
            .max(validation::MIN_AGE);
        let max_age = viewer.age.saturating_add(self.config.age_band_years);

        let candidates = profiles::query_candidates(
            &self.store,
            &CandidateQuery {
                genders: viewer.interested_in.clone(),
                interested_in: viewer.gender,
                min_age,
                max_age,
                exclude_ids: exclusions.into_ids(),
                limit,
                offset,
            },
        )
        .await?;

        let mut entries = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if candidate.personality.is_none() {
                debug!(candidate = %candidate.id, "skipping candidate without personality data");
                continue;
            }
            if let Verdict::Incompatible { reason } = check_dealbreakers(&viewer, &candidate) {
                debug!(candidate = %candidate.id, reason, "dealbreaker rejected candidate");
                continue;
            }

            let distance = distance_between(viewer.location, candidate.location);
            if let Some(radius) = self.config.max_distance_miles {
                // Unknown distance is exempt, never filtered.
                if distance.exceeds(radius) {
                    continue;
                }
            }

            let score = score_pair(&viewer, &candidate);
            entries.push(FeedEntry {
                profile: candidate,
                score,
                distance,
            });
        }

        entries.sort_by(|x, y| {
            y.score
                .overall
                .cmp(&x.score.overall)
                .then_with(|| y.profile.last_active.cmp(&x.profile.last_active))
                .then_with(|| x.profile.id.cmp(&y.profile.id))
        });
        Ok(entries)
    }
}
