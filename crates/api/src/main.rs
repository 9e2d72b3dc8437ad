use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use matchmaker::{Matchmaker, MatchmakerConfig, MatchmakerError};
use matchstore::matches::MatchRecord;
use matchstore::swipes::SwipeKind;
use matchstore::{
    DirectTransport, ErrorClass, MemoryTransport, RestTransport, SessionContext, StoreClient,
    StoreError,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct AppState {
    api_token: Option<String>,
    engine: Matchmaker,
}

#[derive(Debug, Deserialize)]
struct FeedParams {
    user_id: String,
    limit: Option<usize>,
    #[serde(default)]
    offset: usize,
}

#[derive(Debug, Deserialize)]
struct SwipeRequest {
    actor_id: String,
    target_id: String,
    kind: SwipeKind,
}

#[derive(Debug, Serialize)]
struct SwipeResponse {
    outcome: &'static str,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    record: Option<MatchRecord>,
}

#[derive(Debug, Deserialize)]
struct MatchesParams {
    user_id: String,
}

#[derive(Debug, Serialize)]
struct Health {
    status: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = env::var("MATCH_API_ADDR").unwrap_or_else(|_| "127.0.0.1:8787".to_string());
    let api_token = env::var("MATCH_API_TOKEN").ok();

    let engine = Matchmaker::new(build_store(), MatchmakerConfig::from_env());
    let state = AppState { api_token, engine };

    let app = Router::new()
        .route("/health", get(health))
        .route("/feed", get(feed))
        .route("/swipes", post(swipe))
        .route("/swipes/undo", post(undo))
        .route("/matches", get(matches))
        .with_state(state);

    let addr: SocketAddr = addr.parse().expect("Invalid MATCH_API_ADDR");
    info!(%addr, "Match API listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Build the store client: REST against `MATCHSTORE_URL` when configured,
/// in-memory otherwise (local development).
fn build_store() -> StoreClient {
    let session = match env::var("MATCHSTORE_JWT") {
        Ok(token) if !token.trim().is_empty() => {
            Arc::new(SessionContext::with_token("service", token))
        }
        _ => Arc::new(SessionContext::new("service")),
    };

    match env::var("MATCHSTORE_URL") {
        Ok(url) if !url.trim().is_empty() => {
            let api_key = env::var("MATCHSTORE_API_KEY").unwrap_or_default();
            let primary = RestTransport::new(url.clone(), api_key.clone(), session.clone())
                .expect("failed to build store transport");
            info!(url, "Using REST store");
            StoreClient::new(Arc::new(primary), session)
                .with_fallback(Arc::new(DirectTransport::new(url, api_key)))
        }
        _ => {
            warn!("MATCHSTORE_URL not set, using in-memory store");
            StoreClient::new(Arc::new(MemoryTransport::new()), session)
        }
    }
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

async fn feed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<FeedParams>,
) -> Result<Response, ApiError> {
    authorize(&state, &headers)?;
    let entries = state
        .engine
        .build_feed(&params.user_id, params.limit, params.offset)
        .await?;
    Ok(Json(entries).into_response())
}

async fn swipe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SwipeRequest>,
) -> Result<Response, ApiError> {
    authorize(&state, &headers)?;

    let response = match payload.kind {
        SwipeKind::Like => match state.engine.like(&payload.actor_id, &payload.target_id).await? {
            matchmaker::SwipeOutcome::Matched(record) => SwipeResponse {
                outcome: "matched",
                record: Some(record),
            },
            matchmaker::SwipeOutcome::NoMatch => SwipeResponse {
                outcome: "no_match",
                record: None,
            },
        },
        SwipeKind::Pass => {
            state.engine.pass(&payload.actor_id, &payload.target_id).await?;
            SwipeResponse {
                outcome: "passed",
                record: None,
            }
        }
    };

    Ok(Json(response).into_response())
}

async fn undo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SwipeRequest>,
) -> Result<Response, ApiError> {
    authorize(&state, &headers)?;
    state
        .engine
        .undo(&payload.actor_id, &payload.target_id, payload.kind)
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn matches(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<MatchesParams>,
) -> Result<Response, ApiError> {
    authorize(&state, &headers)?;
    let records = state.engine.matches_for(&params.user_id).await?;
    Ok(Json(records).into_response())
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(());
    };

    let Some(value) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Err(ApiError::Unauthorized);
    };

    let Ok(value) = value.to_str() else {
        return Err(ApiError::Unauthorized);
    };

    let token = value.strip_prefix("Bearer ").unwrap_or(value);
    if token != expected {
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}

#[derive(Debug)]
enum ApiError {
    Unauthorized,
    Engine(MatchmakerError),
}

impl From<MatchmakerError> for ApiError {
    fn from(err: MatchmakerError) -> Self {
        ApiError::Engine(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Unauthorized => {
                warn!("Unauthorized request");
                (
                    StatusCode::UNAUTHORIZED,
                    "auth_error",
                    "Unauthorized".to_string(),
                )
            }
            ApiError::Engine(err) => {
                let (status, kind) = classify(&err);
                warn!(error = %err, status = %status, "Request failed");
                (status, kind, err.to_string())
            }
        };

        let body = serde_json::json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });
        (status, Json(body)).into_response()
    }
}

fn classify(err: &MatchmakerError) -> (StatusCode, &'static str) {
    match err {
        MatchmakerError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        MatchmakerError::InsufficientData(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_data")
        }
        MatchmakerError::Store(store) => match store {
            StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            StoreError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            StoreError::Auth(_) => (StatusCode::UNAUTHORIZED, "auth_error"),
            StoreError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            other if other.class() == ErrorClass::Retryable => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        },
    }
}
