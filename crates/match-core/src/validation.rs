//! Input validation for profile fields.

use thiserror::Error;

use crate::profile::{PersonalityTraits, UserProfile};

/// Maximum allowed tag length.
pub const MAX_TAG_LENGTH: usize = 64;

/// Maximum number of interest or value tags per profile.
pub const MAX_TAGS: usize = 50;

/// Minimum allowed age.
pub const MIN_AGE: u8 = 18;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Empty value where one is required.
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    /// Age below the minimum.
    #[error("age {0} is below the minimum of {MIN_AGE}")]
    Underage(u8),
    /// A personality trait outside the 0-100 scale.
    #[error("trait {trait_name} out of range: {value}")]
    TraitOutOfRange { trait_name: &'static str, value: f64 },
    /// Too many tags.
    #[error("{field} has too many tags ({actual}, max {MAX_TAGS})")]
    TooManyTags { field: &'static str, actual: usize },
    /// A tag longer than the limit.
    #[error("{field} tag is too long ({actual} chars, max {MAX_TAG_LENGTH})")]
    TagTooLong { field: &'static str, actual: usize },
    /// A latitude or longitude outside valid bounds.
    #[error("coordinates out of range: lat {lat}, lng {lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },
}

/// Validate a full trait vector.
pub fn validate_traits(traits: &PersonalityTraits) -> Result<(), ValidationError> {
    let named = [
        ("openness", traits.openness),
        ("conscientiousness", traits.conscientiousness),
        ("extraversion", traits.extraversion),
        ("agreeableness", traits.agreeableness),
        ("neuroticism", traits.neuroticism),
    ];
    for (trait_name, value) in named {
        if !(0.0..=100.0).contains(&value) || value.is_nan() {
            return Err(ValidationError::TraitOutOfRange { trait_name, value });
        }
    }
    Ok(())
}

fn validate_tags(field: &'static str, tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::TooManyTags {
            field,
            actual: tags.len(),
        });
    }
    for tag in tags {
        if tag.trim().len() > MAX_TAG_LENGTH {
            return Err(ValidationError::TagTooLong {
                field,
                actual: tag.trim().len(),
            });
        }
    }
    Ok(())
}

/// Validate a profile before it is written to the store.
pub fn validate_profile(profile: &UserProfile) -> Result<(), ValidationError> {
    if profile.id.trim().is_empty() {
        return Err(ValidationError::Empty("id"));
    }
    if profile.display_name.trim().is_empty() {
        return Err(ValidationError::Empty("display_name"));
    }
    if profile.age < MIN_AGE {
        return Err(ValidationError::Underage(profile.age));
    }
    if let Some(traits) = &profile.personality {
        validate_traits(traits)?;
    }
    if let Some(location) = profile.location {
        if !(-90.0..=90.0).contains(&location.lat) || !(-180.0..=180.0).contains(&location.lng) {
            return Err(ValidationError::InvalidCoordinates {
                lat: location.lat,
                lng: location.lng,
            });
        }
    }
    validate_tags("interests", &profile.interests)?;
    validate_tags("values", &profile.values)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Gender, Lifestyle, Location};
    use chrono::Utc;

    fn valid_profile() -> UserProfile {
        UserProfile {
            id: "u-1".to_string(),
            display_name: "Dana".to_string(),
            age: 28,
            gender: Gender::Woman,
            interested_in: vec![Gender::Man],
            location: None,
            lifestyle: Lifestyle::default(),
            personality: Some(PersonalityTraits {
                openness: 85.0,
                conscientiousness: 70.0,
                extraversion: 60.0,
                agreeableness: 80.0,
                neuroticism: 40.0,
            }),
            interests: vec!["hiking".to_string()],
            values: Vec::new(),
            last_active: Utc::now(),
            onboarding_complete: true,
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(validate_profile(&valid_profile()).is_ok());
    }

    #[test]
    fn test_trait_out_of_range() {
        let mut profile = valid_profile();
        profile.personality.as_mut().unwrap().openness = 130.0;
        assert!(matches!(
            validate_profile(&profile),
            Err(ValidationError::TraitOutOfRange { trait_name: "openness", .. })
        ));
    }

    #[test]
    fn test_underage_rejected() {
        let mut profile = valid_profile();
        profile.age = 17;
        assert_eq!(validate_profile(&profile), Err(ValidationError::Underage(17)));
    }

    #[test]
    fn test_bad_coordinates_rejected() {
        let mut profile = valid_profile();
        profile.location = Some(Location { lat: 91.0, lng: 0.0 });
        assert!(matches!(
            validate_profile(&profile),
            Err(ValidationError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut profile = valid_profile();
        profile.id = "  ".to_string();
        assert_eq!(validate_profile(&profile), Err(ValidationError::Empty("id")));
    }
}
