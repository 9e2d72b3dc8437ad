//! Human-readable match highlights.

use crate::profile::{ChildrenPreference, UserProfile};

/// Maximum number of preview reasons per pair.
const MAX_REASONS: usize = 3;

fn shared_tags(a: &[String], b: &[String]) -> Vec<String> {
    let normalize = |t: &String| t.trim().to_lowercase();
    let theirs: std::collections::BTreeSet<String> = b.iter().map(normalize).collect();
    let mut seen = std::collections::BTreeSet::new();
    a.iter()
        .filter(|t| theirs.contains(&normalize(t)))
        .filter(|t| seen.insert(normalize(t)))
        .map(|t| t.trim().to_string())
        .collect()
}

/// Synthesize up to three preview reasons for a pair, in fixed priority
/// order: personality-similarity tier first, then shared interest tags,
/// then shared lifestyle facts.
pub fn preview_reasons(a: &UserProfile, b: &UserProfile, personality: u8) -> Vec<String> {
    let mut reasons = Vec::new();

    if personality >= 85 {
        reasons.push("Your personalities are remarkably similar".to_string());
    } else if personality >= 70 {
        reasons.push("You have similar personalities".to_string());
    }

    let interests = shared_tags(&a.interests, &b.interests);
    match interests.as_slice() {
        [] => {}
        [only] => reasons.push(format!("You both enjoy {only}")),
        [first, second, ..] => reasons.push(format!("You both enjoy {first} and {second}")),
    }

    let values = shared_tags(&a.values, &b.values);
    if let Some(value) = values.first() {
        reasons.push(format!("You share a commitment to {value}"));
    }

    if let (Some(ours), Some(theirs)) = (a.lifestyle.children, b.lifestyle.children) {
        if ours == theirs && ours != ChildrenPreference::Maybe {
            let text = match ours {
                ChildrenPreference::Wants => "You both want children",
                ChildrenPreference::DoesNotWant => "Neither of you wants children",
                ChildrenPreference::Maybe => unreachable!(),
            };
            reasons.push(text.to_string());
        }
    }

    let religions = shared_tags(&a.lifestyle.religion, &b.lifestyle.religion);
    if let Some(religion) = religions.first() {
        reasons.push(format!("You share a {religion} background"));
    }

    reasons.truncate(MAX_REASONS);
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Gender, Lifestyle};
    use chrono::Utc;

    fn profile(interests: &[&str], values: &[&str]) -> UserProfile {
        UserProfile {
            id: "u".to_string(),
            display_name: "U".to_string(),
            age: 30,
            gender: Gender::Woman,
            interested_in: vec![Gender::Man],
            location: None,
            lifestyle: Lifestyle::default(),
            personality: None,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            values: values.iter().map(|s| s.to_string()).collect(),
            last_active: Utc::now(),
            onboarding_complete: true,
        }
    }

    #[test]
    fn test_capped_at_three() {
        let mut a = profile(&["hiking", "jazz"], &["honesty"]);
        let mut b = profile(&["hiking", "jazz"], &["honesty"]);
        a.lifestyle.children = Some(ChildrenPreference::Wants);
        b.lifestyle.children = Some(ChildrenPreference::Wants);
        a.lifestyle.religion = vec!["buddhist".to_string()];
        b.lifestyle.religion = vec!["buddhist".to_string()];

        let reasons = preview_reasons(&a, &b, 92);
        assert_eq!(reasons.len(), 3);
        // Personality tier always leads when present.
        assert!(reasons[0].contains("remarkably similar"));
    }

    #[test]
    fn test_priority_order() {
        let a = profile(&["hiking"], &[]);
        let b = profile(&["hiking"], &[]);
        let reasons = preview_reasons(&a, &b, 75);
        assert_eq!(
            reasons,
            vec![
                "You have similar personalities".to_string(),
                "You both enjoy hiking".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_reasons_for_disjoint_low_similarity() {
        let a = profile(&["hiking"], &["honesty"]);
        let b = profile(&["chess"], &["ambition"]);
        assert!(preview_reasons(&a, &b, 40).is_empty());
    }

    #[test]
    fn test_shared_tags_case_insensitive() {
        let a = profile(&["Hiking"], &[]);
        let b = profile(&["hiking "], &[]);
        let reasons = preview_reasons(&a, &b, 0);
        assert_eq!(reasons, vec!["You both enjoy Hiking".to_string()]);
    }
}
