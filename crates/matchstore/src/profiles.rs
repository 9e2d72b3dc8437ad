//! Profile read/write operations.

use match_core::{validation, Gender, UserProfile};
use serde_json::{json, Value};

use crate::client::StoreClient;
use crate::error::{Result, StoreError};
use crate::request::{Filter, OrderBy, StoreRequest};

const COLLECTION: &str = "profiles";

/// Load one profile by id.
pub async fn get_profile(client: &StoreClient, user_id: &str) -> Result<UserProfile> {
    client
        .fetch_optional(&StoreRequest::select(
            COLLECTION,
            vec![Filter::eq("id", json!(user_id))],
        ))
        .await?
        .ok_or_else(|| StoreError::NotFound {
            entity: "profile",
            id: user_id.to_string(),
        })
}

/// Create or replace a profile. Validates before writing.
pub async fn upsert_profile(client: &StoreClient, profile: &UserProfile) -> Result<()> {
    validation::validate_profile(profile)
        .map_err(|e| StoreError::Validation(e.to_string()))?;
    client
        .upsert(COLLECTION, std::slice::from_ref(profile), &["id"])
        .await
}

/// Apply a partial patch to an existing profile (e.g. bumping
/// `last_active`). Full replacements go through [`upsert_profile`] so they
/// are validated; patches are trusted field-level writes.
pub async fn update_profile(client: &StoreClient, user_id: &str, patch: Value) -> Result<()> {
    let updated = client
        .update(&StoreRequest::update(
            COLLECTION,
            vec![Filter::eq("id", json!(user_id))],
            patch,
        ))
        .await?;
    if updated == 0 {
        return Err(StoreError::NotFound {
            entity: "profile",
            id: user_id.to_string(),
        });
    }
    Ok(())
}

/// Candidate pool query for the discovery feed.
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    /// Candidate gender must be one of these (the requester's interest set).
    pub genders: Vec<Gender>,
    /// Candidate's interest set must contain this (the requester's gender).
    pub interested_in: Gender,
    /// Symmetric age band, inclusive.
    pub min_age: u8,
    pub max_age: u8,
    /// Ids that must not appear (the exclusion set).
    pub exclude_ids: Vec<String>,
    pub limit: usize,
    pub offset: usize,
}

/// Query candidate profiles: onboarding complete, mutual gender interest,
/// inside the age band, not excluded, most recently active first.
pub async fn query_candidates(
    client: &StoreClient,
    query: &CandidateQuery,
) -> Result<Vec<UserProfile>> {
    let request = StoreRequest::select(
        COLLECTION,
        vec![
            Filter::eq("onboarding_complete", json!(true)),
            Filter::is_in("gender", serde_json::to_value(&query.genders)?),
            Filter::contains("interested_in", serde_json::to_value(query.interested_in)?),
            Filter::gte("age", json!(query.min_age)),
            Filter::lte("age", json!(query.max_age)),
            Filter::not_in("id", serde_json::to_value(&query.exclude_ids)?),
        ],
    )
    .order(OrderBy::descending("last_active"))
    .page(query.limit, query.offset);

    client.fetch(&request).await
}
