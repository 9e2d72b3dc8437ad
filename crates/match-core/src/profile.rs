//! User profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gender identity, also used for interest sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Woman,
    Man,
    NonBinary,
}

/// Children preference. Absence of a value means the user has not answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildrenPreference {
    Wants,
    DoesNotWant,
    Maybe,
}

impl ChildrenPreference {
    /// Whether this is a firm answer rather than "maybe".
    pub fn is_firm(self) -> bool {
        !matches!(self, ChildrenPreference::Maybe)
    }
}

/// Ordinal frequency level for drinking, smoking, and cannabis use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstanceUse {
    Never,
    Rarely,
    Sometimes,
    Often,
}

impl SubstanceUse {
    /// Position on the ordinal scale, for gap computation.
    pub fn ordinal(self) -> i64 {
        match self {
            SubstanceUse::Never => 0,
            SubstanceUse::Rarely => 1,
            SubstanceUse::Sometimes => 2,
            SubstanceUse::Often => 3,
        }
    }
}

/// Ordinal political leaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoliticalLeaning {
    Left,
    CenterLeft,
    Center,
    CenterRight,
    Right,
}

impl PoliticalLeaning {
    /// Position on the ordinal scale, for gap computation.
    pub fn ordinal(self) -> i64 {
        match self {
            PoliticalLeaning::Left => 0,
            PoliticalLeaning::CenterLeft => 1,
            PoliticalLeaning::Center => 2,
            PoliticalLeaning::CenterRight => 3,
            PoliticalLeaning::Right => 4,
        }
    }
}

/// Lifestyle attributes used by the lifestyle score and dealbreaker filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lifestyle {
    /// Drinking frequency, if answered.
    pub drinking: Option<SubstanceUse>,
    /// Smoking frequency, if answered.
    pub smoking: Option<SubstanceUse>,
    /// Cannabis use frequency, if answered.
    pub cannabis: Option<SubstanceUse>,
    /// Religion tags (e.g., "jewish", "spiritual"). Empty when undeclared.
    #[serde(default)]
    pub religion: Vec<String>,
    /// Political leaning, if answered.
    pub political: Option<PoliticalLeaning>,
    /// Children preference, if answered.
    pub children: Option<ChildrenPreference>,
}

/// Big Five personality trait vector. Each trait is on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl PersonalityTraits {
    /// The five traits as a fixed-order array.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }
}

/// Geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// A user profile snapshot.
///
/// Owned by the user and mutated only through explicit profile updates;
/// treated as immutable for the duration of a single scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user id.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Age in years.
    pub age: u8,
    /// Gender identity.
    pub gender: Gender,
    /// Genders this user is interested in.
    pub interested_in: Vec<Gender>,
    /// Location, if the user has shared one.
    pub location: Option<Location>,
    /// Lifestyle attributes.
    #[serde(default)]
    pub lifestyle: Lifestyle,
    /// Big Five trait vector, present once the personality quiz is done.
    pub personality: Option<PersonalityTraits>,
    /// Free-text interest tags.
    #[serde(default)]
    pub interests: Vec<String>,
    /// Free-text value tags.
    #[serde(default)]
    pub values: Vec<String>,
    /// Last activity timestamp, used for recency ordering.
    pub last_active: DateTime<Utc>,
    /// Whether onboarding finished. Incomplete profiles never enter feeds.
    pub onboarding_complete: bool,
}

impl UserProfile {
    /// Whether this user's interest set includes the other's gender.
    pub fn is_interested_in(&self, other: &UserProfile) -> bool {
        self.interested_in.contains(&other.gender)
    }
}
