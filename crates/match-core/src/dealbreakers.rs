//! Hard pre-scoring compatibility filter.
//!
//! Dealbreakers are binary: a rejected pair is never scored, because scoring
//! an incompatible pair is wasted work. The check is pure and symmetric.

use crate::profile::UserProfile;
use crate::score::children_firmly_opposed;

/// Verdict from the dealbreaker check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Compatible,
    /// Rejected, with a human-readable diagnostic reason.
    Incompatible { reason: String },
}

impl Verdict {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Verdict::Compatible)
    }
}

/// Check hard dealbreakers for a pair.
///
/// A pair is rejected when:
/// - gender interest is not mutual (both directions must hold), or
/// - both sides declared a firm, opposite children preference. A "maybe" or
///   unanswered preference on either side passes.
pub fn check_dealbreakers(a: &UserProfile, b: &UserProfile) -> Verdict {
    if !a.is_interested_in(b) || !b.is_interested_in(a) {
        return Verdict::Incompatible {
            reason: "gender interest is not mutual".to_string(),
        };
    }

    if children_firmly_opposed(a.lifestyle.children, b.lifestyle.children) {
        return Verdict::Incompatible {
            reason: "firm opposite children preferences".to_string(),
        };
    }

    Verdict::Compatible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ChildrenPreference, Gender, Lifestyle};
    use chrono::Utc;

    fn profile(id: &str, gender: Gender, interested_in: Vec<Gender>) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            display_name: id.to_string(),
            age: 30,
            gender,
            interested_in,
            location: None,
            lifestyle: Lifestyle::default(),
            personality: None,
            interests: Vec::new(),
            values: Vec::new(),
            last_active: Utc::now(),
            onboarding_complete: true,
        }
    }

    #[test]
    fn test_mutual_interest_accepted() {
        let a = profile("a", Gender::Woman, vec![Gender::Man]);
        let b = profile("b", Gender::Man, vec![Gender::Woman]);
        assert!(check_dealbreakers(&a, &b).is_compatible());
    }

    #[test]
    fn test_one_directional_interest_rejected() {
        let a = profile("a", Gender::Woman, vec![Gender::Man]);
        // b is not interested in women.
        let b = profile("b", Gender::Man, vec![Gender::Man]);
        let verdict = check_dealbreakers(&a, &b);
        assert!(!verdict.is_compatible());
        assert_eq!(verdict, check_dealbreakers(&b, &a));
    }

    #[test]
    fn test_firm_opposite_children_rejected() {
        let mut a = profile("a", Gender::Woman, vec![Gender::Man]);
        let mut b = profile("b", Gender::Man, vec![Gender::Woman]);
        a.lifestyle.children = Some(ChildrenPreference::Wants);
        b.lifestyle.children = Some(ChildrenPreference::DoesNotWant);
        assert!(!check_dealbreakers(&a, &b).is_compatible());
    }

    #[test]
    fn test_maybe_on_either_side_accepted() {
        let mut a = profile("a", Gender::Woman, vec![Gender::Man]);
        let mut b = profile("b", Gender::Man, vec![Gender::Woman]);
        a.lifestyle.children = Some(ChildrenPreference::Wants);
        b.lifestyle.children = Some(ChildrenPreference::Maybe);
        assert!(check_dealbreakers(&a, &b).is_compatible());

        // Unanswered also passes, even against a firm preference.
        b.lifestyle.children = None;
        assert!(check_dealbreakers(&a, &b).is_compatible());
    }
}
