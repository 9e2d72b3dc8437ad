//! In-memory transport for tests and local development.
//!
//! Behaves like the production store, including the uniqueness constraints
//! the lifecycle race resolution depends on: duplicate swipe rows and
//! duplicate match pair keys surface as [`StoreError::Conflict`]. Cloning a
//! `MemoryTransport` shares its state, so one instance can serve as both
//! primary and fallback in tests.

use std::cmp::Ordering as CmpOrdering;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::request::{Filter, FilterOp, Operation, OrderBy, StoreRequest};
use crate::transport::{FallbackTransport, StoreTransport};

/// Unique constraints per collection, mirroring the production schema.
fn unique_columns(collection: &str) -> Option<&'static [&'static str]> {
    match collection {
        "profiles" => Some(&["id"]),
        "swipes" => Some(&["actor_id", "target_id", "kind"]),
        "matches" => Some(&["pair_key"]),
        "blocks" => Some(&["blocker_id", "blocked_id"]),
        _ => None,
    }
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Value>>,
    scripted_failures: VecDeque<StoreError>,
    call_count: u64,
    fallback_tokens: Vec<String>,
}

/// Shared-state in-memory store transport.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an error to be returned by the next `execute` call. Multiple
    /// queued errors are consumed in order, one per call.
    pub fn push_failure(&self, err: StoreError) {
        let mut inner = self.inner.lock().expect("memory transport poisoned");
        inner.scripted_failures.push_back(err);
    }

    /// Total `execute` calls served (including scripted failures).
    pub fn call_count(&self) -> u64 {
        self.inner.lock().expect("memory transport poisoned").call_count
    }

    /// Tokens received through the fallback path, in order.
    pub fn fallback_tokens(&self) -> Vec<String> {
        self.inner
            .lock()
            .expect("memory transport poisoned")
            .fallback_tokens
            .clone()
    }

    /// All rows currently in a collection, for test assertions.
    pub fn rows(&self, collection: &str) -> Vec<Value> {
        self.inner
            .lock()
            .expect("memory transport poisoned")
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn run(&self, request: &StoreRequest) -> Result<Vec<Value>> {
        let mut inner = self.inner.lock().expect("memory transport poisoned");
        inner.call_count += 1;
        if let Some(err) = inner.scripted_failures.pop_front() {
            return Err(err);
        }

        match &request.operation {
            Operation::Select { filters, order, limit, offset } => {
                let rows = inner.collections.entry(request.collection.clone()).or_default();
                let mut matched: Vec<Value> = rows
                    .iter()
                    .filter(|row| matches_all(row, filters))
                    .cloned()
                    .collect();
                if let Some(order) = order {
                    sort_rows(&mut matched, order);
                }
                let offset = offset.unwrap_or(0);
                let matched: Vec<Value> = matched
                    .into_iter()
                    .skip(offset)
                    .take(limit.unwrap_or(usize::MAX))
                    .collect();
                Ok(matched)
            }
            Operation::Insert { rows: new_rows } => {
                let unique = unique_columns(&request.collection);
                let rows = inner.collections.entry(request.collection.clone()).or_default();
                for new_row in new_rows {
                    if let Some(columns) = unique {
                        if rows.iter().any(|row| same_key(row, new_row, columns)) {
                            return Err(StoreError::Conflict(format!(
                                "duplicate key in {}",
                                request.collection
                            )));
                        }
                    }
                    rows.push(new_row.clone());
                }
                Ok(new_rows.clone())
            }
            Operation::Upsert { rows: new_rows, conflict_target } => {
                let rows = inner.collections.entry(request.collection.clone()).or_default();
                let mut affected = Vec::new();
                for new_row in new_rows {
                    let columns: Vec<&str> = conflict_target.iter().map(String::as_str).collect();
                    if let Some(existing) =
                        rows.iter_mut().find(|row| same_key(row, new_row, &columns))
                    {
                        *existing = new_row.clone();
                    } else {
                        rows.push(new_row.clone());
                    }
                    affected.push(new_row.clone());
                }
                Ok(affected)
            }
            Operation::Update { filters, patch } => {
                let rows = inner.collections.entry(request.collection.clone()).or_default();
                let mut affected = Vec::new();
                for row in rows.iter_mut().filter(|row| matches_all(row, filters)) {
                    merge_patch(row, patch);
                    affected.push(row.clone());
                }
                Ok(affected)
            }
            Operation::Delete { filters } => {
                let rows = inner.collections.entry(request.collection.clone()).or_default();
                let mut removed = Vec::new();
                rows.retain(|row| {
                    if matches_all(row, filters) {
                        removed.push(row.clone());
                        false
                    } else {
                        true
                    }
                });
                Ok(removed)
            }
        }
    }
}

fn same_key(a: &Value, b: &Value, columns: &[&str]) -> bool {
    columns.iter().all(|col| a.get(col) == b.get(col))
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| matches_one(row, filter))
}

fn matches_one(row: &Value, filter: &Filter) -> bool {
    let cell = row.get(&filter.column).unwrap_or(&Value::Null);
    match filter.op {
        FilterOp::Eq => cell == &filter.value,
        FilterOp::Neq => cell != &filter.value,
        FilterOp::Gte => compare(cell, &filter.value) != CmpOrdering::Less,
        FilterOp::Lte => compare(cell, &filter.value) != CmpOrdering::Greater,
        FilterOp::In => filter
            .value
            .as_array()
            .is_some_and(|set| set.contains(cell)),
        FilterOp::NotIn => !filter
            .value
            .as_array()
            .is_some_and(|set| set.contains(cell)),
        FilterOp::Contains => {
            let Some(haystack) = cell.as_array() else {
                return false;
            };
            match &filter.value {
                Value::Array(needles) => needles.iter().all(|n| haystack.contains(n)),
                needle => haystack.contains(needle),
            }
        }
    }
}

/// Order two JSON values: numerically when both are numbers, chronologically
/// when both parse as RFC 3339 timestamps, lexicographically otherwise.
fn compare(a: &Value, b: &Value) -> CmpOrdering {
    if let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) {
        return a.partial_cmp(&b).unwrap_or(CmpOrdering::Equal);
    }
    if let (Some(a), Some(b)) = (a.as_str(), b.as_str()) {
        if let (Ok(a), Ok(b)) = (
            DateTime::parse_from_rfc3339(a),
            DateTime::parse_from_rfc3339(b),
        ) {
            return a.cmp(&b);
        }
        return a.cmp(b);
    }
    CmpOrdering::Equal
}

fn sort_rows(rows: &mut [Value], order: &OrderBy) {
    rows.sort_by(|a, b| {
        let cell_a = a.get(&order.column).unwrap_or(&Value::Null);
        let cell_b = b.get(&order.column).unwrap_or(&Value::Null);
        let ordering = compare(cell_a, cell_b);
        if order.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// Shallow object merge: patch keys overwrite row keys.
fn merge_patch(row: &mut Value, patch: &Value) {
    if let (Value::Object(row), Value::Object(patch)) = (row, patch) {
        for (key, value) in patch {
            row.insert(key.clone(), value.clone());
        }
    }
}

#[async_trait]
impl StoreTransport for MemoryTransport {
    async fn execute(&self, request: &StoreRequest) -> Result<Vec<Value>> {
        self.run(request)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl FallbackTransport for MemoryTransport {
    async fn execute_with_token(&self, request: &StoreRequest, token: &str) -> Result<Vec<Value>> {
        {
            let mut inner = self.inner.lock().expect("memory transport poisoned");
            inner.fallback_tokens.push(token.to_string());
        }
        self.run(request)
    }

    fn name(&self) -> &str {
        "memory-fallback"
    }
}
