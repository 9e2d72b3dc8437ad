//! Fallback transport: a direct, low-level request path.
//!
//! Used only after the primary transport exhausts its retries. Each call
//! builds a one-shot HTTP client, bypassing the primary's pooled connection
//! machinery, and authenticates with the token the caller hands it - it has
//! no session handling of its own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::request::StoreRequest;
use crate::rest::{plan_request, prefer_header, rows_from_response};
use crate::transport::FallbackTransport;

pub struct DirectTransport {
    base_url: String,
    api_key: String,
}

impl DirectTransport {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl FallbackTransport for DirectTransport {
    async fn execute_with_token(&self, request: &StoreRequest, token: &str) -> Result<Vec<Value>> {
        let (method, query, body) = plan_request(request);
        let url = format!("{}/{}", self.base_url, request.collection);
        debug!(%url, method = %method, "direct fallback request");

        // Fresh connection on purpose: if the pooled client's connections are
        // the thing that is wedged, reusing them defeats the fallback.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| StoreError::Network(format!("failed to build fallback client: {e}")))?;

        let mut builder = client
            .request(method, &url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .header("Prefer", prefer_header(&request.operation))
            .query(&query);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(StoreError::from_reqwest)?;
        rows_from_response(response).await
    }

    fn name(&self) -> &str {
        "direct"
    }
}
