//! Core domain types and compatibility scoring for the matching engine.
//!
//! This crate is pure: no I/O, no async, no clocks. It defines:
//!
//! - [`UserProfile`] and its nested attribute types
//! - [`CompatibilityScore`] - the weighted multi-factor score breakdown
//! - [`score_pair`] and the individual scoring functions
//! - [`check_dealbreakers`] - the hard pre-scoring filter
//! - [`distance_between`] - great-circle distance with missing-data handling
//! - [`preview_reasons`] - human-readable match highlights
//!
//! Everything here operates on immutable profile snapshots; a profile never
//! changes mid-scoring-pass.

pub mod dealbreakers;
pub mod distance;
pub mod profile;
pub mod reasons;
pub mod score;
pub mod validation;

pub use dealbreakers::{check_dealbreakers, Verdict};
pub use distance::{distance_between, Distance};
pub use profile::{
    ChildrenPreference, Gender, Lifestyle, Location, PersonalityTraits, PoliticalLeaning,
    SubstanceUse, UserProfile,
};
pub use reasons::preview_reasons;
pub use score::{
    lifestyle_score, overall_score, personality_score, score_pair, tag_overlap_score,
    CompatibilityScore,
};
pub use validation::ValidationError;
