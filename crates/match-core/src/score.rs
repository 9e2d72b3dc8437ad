//! Pairwise compatibility scoring.
//!
//! Four independent, pure scoring functions, each producing an integer in
//! [0,100], combined into an overall score with fixed weights:
//! personality 50%, interests/values 25%, lifestyle 25%.

use serde::{Deserialize, Serialize};

use crate::profile::{ChildrenPreference, Lifestyle, PersonalityTraits, UserProfile};
use crate::reasons::preview_reasons;

/// Number of Big Five traits.
const TRAIT_COUNT: f64 = 5.0;

/// Fixed penalty when both sides hold firm, opposite children preferences.
const CHILDREN_CONFLICT_PENALTY: i64 = 40;

/// A computed compatibility breakdown for one pair of users.
///
/// Ephemeral: computed on demand and only persisted as a frozen snapshot
/// attached to a created match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityScore {
    /// Personality similarity, 0-100.
    pub personality: u8,
    /// Combined interest/value tag overlap, 0-100.
    pub interests: u8,
    /// Lifestyle compatibility, 0-100.
    pub lifestyle: u8,
    /// Weighted overall score, 0-100.
    pub overall: u8,
    /// Up to three human-readable match highlights.
    pub reasons: Vec<String>,
}

/// Clamp a float to [0,100] and round half-up to an integer score.
fn to_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

/// Personality similarity from normalized Euclidean distance over the
/// five-trait vector. Identical vectors score 100; maximally divergent
/// vectors score near 0.
pub fn personality_score(a: &PersonalityTraits, b: &PersonalityTraits) -> u8 {
    let (a, b) = (a.as_array(), b.as_array());
    let sum_sq: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
    let distance = (sum_sq / TRAIT_COUNT).sqrt();
    to_score((1.0 - distance / 100.0) * 100.0)
}

/// Jaccard similarity over two tag sets, as a percentage.
///
/// Tags are trimmed and compared case-insensitively. Two empty sets score 0,
/// not 100: absence of data is not similarity.
pub fn tag_overlap_score(a: &[String], b: &[String]) -> u8 {
    let norm = |tags: &[String]| -> std::collections::BTreeSet<String> {
        tags.iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    };
    let (a, b) = (norm(a), norm(b));
    if a.is_empty() && b.is_empty() {
        return 0;
    }
    let intersection = a.intersection(&b).count() as f64;
    let union = a.union(&b).count() as f64;
    to_score(intersection / union * 100.0)
}

/// Score adjustment for one ordinal attribute pair, where `steep` is the
/// per-level penalty applied beyond adjacent levels.
fn ordinal_adjustment(a: Option<i64>, b: Option<i64>, steep: i64) -> i64 {
    match (a, b) {
        (Some(a), Some(b)) => match (a - b).abs() {
            0 => 5,
            1 => 2,
            gap => -steep * gap,
        },
        // One or both sides unanswered: no signal either way.
        _ => 0,
    }
}

/// Whether two children preferences are a firm, direct conflict.
///
/// Only `Wants` against `DoesNotWant` counts; "maybe" or unanswered on
/// either side never conflicts.
pub(crate) fn children_firmly_opposed(
    a: Option<ChildrenPreference>,
    b: Option<ChildrenPreference>,
) -> bool {
    matches!(
        (a, b),
        (Some(ChildrenPreference::Wants), Some(ChildrenPreference::DoesNotWant))
            | (Some(ChildrenPreference::DoesNotWant), Some(ChildrenPreference::Wants))
    )
}

/// Lifestyle compatibility from a fixed rule table.
///
/// Starts at 100 and adjusts per attribute: exact matches add a bonus,
/// adjacent ordinal levels add a smaller one, larger gaps subtract
/// proportionally to the gap. Political divergence is penalized more steeply
/// than substance-use divergence, and a firm opposite children preference
/// costs a large fixed penalty.
pub fn lifestyle_score(a: &Lifestyle, b: &Lifestyle) -> u8 {
    let mut score: i64 = 100;

    if children_firmly_opposed(a.children, b.children) {
        score -= CHILDREN_CONFLICT_PENALTY;
    } else if a.children.is_some() && a.children == b.children {
        score += 10;
    }

    let religion_a: std::collections::BTreeSet<_> =
        a.religion.iter().map(|r| r.trim().to_lowercase()).collect();
    let religion_b: std::collections::BTreeSet<_> =
        b.religion.iter().map(|r| r.trim().to_lowercase()).collect();
    if !religion_a.is_empty() && !religion_b.is_empty() {
        if religion_a.intersection(&religion_b).next().is_some() {
            score += 10;
        } else {
            score -= 10;
        }
    }

    for (ours, theirs) in [
        (a.drinking, b.drinking),
        (a.smoking, b.smoking),
        (a.cannabis, b.cannabis),
    ] {
        score += ordinal_adjustment(
            ours.map(|u| u.ordinal()),
            theirs.map(|u| u.ordinal()),
            4,
        );
    }

    score += ordinal_adjustment(
        a.political.map(|p| p.ordinal()),
        b.political.map(|p| p.ordinal()),
        8,
    );

    score.clamp(0, 100) as u8
}

/// Weighted overall score.
///
/// `interests` and `values` are averaged into a single combined component
/// before weighting. All inputs and the output are integers in [0,100].
pub fn overall_score(personality: u8, interests: u8, values: u8, lifestyle: u8) -> u8 {
    let combined = (f64::from(interests) + f64::from(values)) / 2.0;
    to_score(f64::from(personality) * 0.5 + combined * 0.25 + f64::from(lifestyle) * 0.25)
}

/// Compute the full compatibility breakdown for a pair.
///
/// A missing trait vector on either side contributes a personality
/// component of 0. Feed construction skips such candidates before scoring;
/// this total form exists so match creation on older data cannot fail.
pub fn score_pair(a: &UserProfile, b: &UserProfile) -> CompatibilityScore {
    let personality = match (a.personality.as_ref(), b.personality.as_ref()) {
        (Some(pa), Some(pb)) => personality_score(pa, pb),
        _ => 0,
    };
    let interest_tags = tag_overlap_score(&a.interests, &b.interests);
    let value_tags = tag_overlap_score(&a.values, &b.values);
    let lifestyle = lifestyle_score(&a.lifestyle, &b.lifestyle);
    let overall = overall_score(personality, interest_tags, value_tags, lifestyle);
    let interests = to_score((f64::from(interest_tags) + f64::from(value_tags)) / 2.0);
    let reasons = preview_reasons(a, b, personality);

    CompatibilityScore {
        personality,
        interests,
        lifestyle,
        overall,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{PoliticalLeaning, SubstanceUse};

    fn traits(o: f64, c: f64, e: f64, a: f64, n: f64) -> PersonalityTraits {
        PersonalityTraits {
            openness: o,
            conscientiousness: c,
            extraversion: e,
            agreeableness: a,
            neuroticism: n,
        }
    }

    #[test]
    fn test_identical_vectors_score_100() {
        let t = traits(85.0, 70.0, 60.0, 80.0, 40.0);
        assert_eq!(personality_score(&t, &t), 100);
    }

    #[test]
    fn test_opposite_extremes_score_zero() {
        let lo = traits(0.0, 0.0, 0.0, 0.0, 0.0);
        let hi = traits(100.0, 100.0, 100.0, 100.0, 100.0);
        assert_eq!(personality_score(&lo, &hi), 0);
    }

    #[test]
    fn test_worked_example_personality() {
        // The two profiles from the product scenario: sum of squared diffs is
        // 275, so d = sqrt(55) and the score rounds to 93.
        let requester = traits(85.0, 70.0, 60.0, 80.0, 40.0);
        let candidate = traits(75.0, 65.0, 70.0, 75.0, 35.0);
        assert_eq!(personality_score(&requester, &candidate), 93);
    }

    #[test]
    fn test_jaccard_symmetry_and_identity() {
        let a = vec!["Hiking".to_string(), "jazz ".to_string()];
        let b = vec!["hiking".to_string(), "cooking".to_string()];
        assert_eq!(tag_overlap_score(&a, &b), tag_overlap_score(&b, &a));
        assert_eq!(tag_overlap_score(&a, &a), 100);
        assert_eq!(tag_overlap_score(&[], &[]), 0);
    }

    #[test]
    fn test_jaccard_case_insensitive_trimmed() {
        let a = vec![" Hiking ".to_string()];
        let b = vec!["hiking".to_string()];
        assert_eq!(tag_overlap_score(&a, &b), 100);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        let a = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let b = vec!["b".to_string(), "c".to_string(), "d".to_string()];
        // 2 shared out of 4 total -> 50.
        assert_eq!(tag_overlap_score(&a, &b), 50);
    }

    #[test]
    fn test_lifestyle_exact_matches_stay_at_ceiling() {
        let style = Lifestyle {
            drinking: Some(SubstanceUse::Rarely),
            smoking: Some(SubstanceUse::Never),
            cannabis: Some(SubstanceUse::Never),
            religion: vec!["spiritual".to_string()],
            political: Some(PoliticalLeaning::Center),
            children: Some(ChildrenPreference::Wants),
        };
        assert_eq!(lifestyle_score(&style, &style), 100);
    }

    #[test]
    fn test_lifestyle_children_conflict_penalty() {
        let wants = Lifestyle {
            children: Some(ChildrenPreference::Wants),
            ..Lifestyle::default()
        };
        let does_not = Lifestyle {
            children: Some(ChildrenPreference::DoesNotWant),
            ..Lifestyle::default()
        };
        assert_eq!(lifestyle_score(&wants, &does_not), 60);
        // A "maybe" on either side is not a conflict.
        let maybe = Lifestyle {
            children: Some(ChildrenPreference::Maybe),
            ..Lifestyle::default()
        };
        assert_eq!(lifestyle_score(&wants, &maybe), 100);
    }

    #[test]
    fn test_lifestyle_political_steeper_than_substance() {
        let base = Lifestyle::default();
        let left = Lifestyle {
            political: Some(PoliticalLeaning::Left),
            ..base.clone()
        };
        let right = Lifestyle {
            political: Some(PoliticalLeaning::Right),
            ..base.clone()
        };
        let never = Lifestyle {
            drinking: Some(SubstanceUse::Never),
            ..base.clone()
        };
        let often = Lifestyle {
            drinking: Some(SubstanceUse::Often),
            ..base
        };
        let political_penalty = 100 - i64::from(lifestyle_score(&left, &right));
        let substance_penalty = 100 - i64::from(lifestyle_score(&never, &often));
        assert!(political_penalty > substance_penalty);
    }

    #[test]
    fn test_overall_weighting() {
        // 90*0.5 + ((80+60)/2)*0.25 + 40*0.25 = 45 + 17.5 + 10 = 72.5 -> 73.
        assert_eq!(overall_score(90, 80, 60, 40), 73);
    }

    #[test]
    fn test_overall_always_in_range() {
        // Sweep component extremes and a grid of interior points.
        for p in [0u8, 1, 50, 99, 100] {
            for i in [0u8, 33, 100] {
                for v in [0u8, 67, 100] {
                    for l in [0u8, 50, 100] {
                        let overall = overall_score(p, i, v, l);
                        assert!(overall <= 100);
                    }
                }
            }
        }
        assert_eq!(overall_score(100, 100, 100, 100), 100);
        assert_eq!(overall_score(0, 0, 0, 0), 0);
    }
}
