//! Primary REST transport.
//!
//! Speaks a PostgREST-style row API: filters become query-string predicates,
//! writes are JSON row arrays, and `Prefer: return=representation` makes
//! every operation return the affected rows.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::request::{Filter, FilterOp, Operation, StoreRequest};
use crate::session::TokenProvider;
use crate::transport::StoreTransport;

/// Render a JSON scalar for use inside a query-string predicate.
pub(crate) fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_list(value: &Value, open: char, close: char) -> String {
    let items = value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(render_scalar)
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_else(|| render_scalar(value));
    format!("{open}{items}{close}")
}

/// Render one filter as a `(column, predicate)` query pair.
pub(crate) fn render_filter(filter: &Filter) -> (String, String) {
    let predicate = match filter.op {
        FilterOp::Eq => format!("eq.{}", render_scalar(&filter.value)),
        FilterOp::Neq => format!("neq.{}", render_scalar(&filter.value)),
        FilterOp::Gte => format!("gte.{}", render_scalar(&filter.value)),
        FilterOp::Lte => format!("lte.{}", render_scalar(&filter.value)),
        FilterOp::In => format!("in.{}", render_list(&filter.value, '(', ')')),
        FilterOp::NotIn => format!("not.in.{}", render_list(&filter.value, '(', ')')),
        FilterOp::Contains => format!("cs.{}", render_list(&filter.value, '{', '}')),
    };
    (filter.column.clone(), predicate)
}

/// Decompose a request into HTTP method, query pairs, and body.
pub(crate) fn plan_request(
    request: &StoreRequest,
) -> (Method, Vec<(String, String)>, Option<Value>) {
    match &request.operation {
        Operation::Select { filters, order, limit, offset } => {
            let mut query: Vec<(String, String)> = filters.iter().map(render_filter).collect();
            if let Some(order) = order {
                let direction = if order.descending { "desc" } else { "asc" };
                query.push(("order".to_string(), format!("{}.{direction}", order.column)));
            }
            if let Some(limit) = limit {
                query.push(("limit".to_string(), limit.to_string()));
            }
            if let Some(offset) = offset {
                query.push(("offset".to_string(), offset.to_string()));
            }
            (Method::GET, query, None)
        }
        Operation::Insert { rows } => (Method::POST, Vec::new(), Some(Value::Array(rows.clone()))),
        Operation::Upsert { rows, conflict_target } => {
            let query = vec![("on_conflict".to_string(), conflict_target.join(","))];
            (Method::POST, query, Some(Value::Array(rows.clone())))
        }
        Operation::Update { filters, patch } => {
            let query = filters.iter().map(render_filter).collect();
            (Method::PATCH, query, Some(patch.clone()))
        }
        Operation::Delete { filters } => {
            let query = filters.iter().map(render_filter).collect();
            (Method::DELETE, query, None)
        }
    }
}

/// Turn a response into rows, mapping non-success statuses to store errors.
pub(crate) async fn rows_from_response(response: Response) -> Result<Vec<Value>> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(StoreError::from_status(status.as_u16(), message));
    }

    let body = response.text().await.map_err(StoreError::from_reqwest)?;
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(&body)? {
        Value::Array(rows) => Ok(rows),
        single => Ok(vec![single]),
    }
}

/// Primary transport over a pooled HTTP client.
pub struct RestTransport {
    base_url: String,
    api_key: String,
    client: Client,
    session: Arc<dyn TokenProvider>,
}

impl RestTransport {
    /// Build the primary transport.
    ///
    /// `base_url` is the row-API root (e.g. `https://db.example.com/rest/v1`).
    /// The connect timeout is deliberately shorter than the per-attempt
    /// timeout enforced by the retry layer.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        session: Arc<dyn TokenProvider>,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| StoreError::Network(format!("failed to build http client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
            session,
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = self.api_key.parse() {
            headers.insert("apikey", key);
        }
        // The session token takes precedence; the api key is the anonymous
        // floor when no user session is active.
        let bearer = self
            .session
            .access_token()
            .unwrap_or_else(|| self.api_key.clone());
        if let Ok(auth) = format!("Bearer {bearer}").parse() {
            headers.insert(reqwest::header::AUTHORIZATION, auth);
        }
        headers
    }
}

#[async_trait]
impl StoreTransport for RestTransport {
    async fn execute(&self, request: &StoreRequest) -> Result<Vec<Value>> {
        let (method, query, body) = plan_request(request);
        let url = format!("{}/{}", self.base_url, request.collection);
        debug!(%url, method = %method, collection = %request.collection, "rest request");

        let mut builder = self
            .client
            .request(method, &url)
            .headers(self.headers())
            .header("Prefer", prefer_header(&request.operation))
            .query(&query);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(StoreError::from_reqwest)?;
        rows_from_response(response).await
    }

    fn name(&self) -> &str {
        "rest"
    }
}

/// `Prefer` header per operation; upserts merge on the conflict target.
pub(crate) fn prefer_header(operation: &Operation) -> &'static str {
    match operation {
        Operation::Upsert { .. } => "resolution=merge-duplicates,return=representation",
        _ => "return=representation",
    }
}
