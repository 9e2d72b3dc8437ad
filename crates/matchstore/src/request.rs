//! Transport-agnostic request model.
//!
//! A [`StoreRequest`] names a collection and one typed operation against it.
//! Requests are cheap to clone: the retry layer re-issues the same request
//! on each attempt.

use serde_json::Value;

/// Comparison operator for a filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Gte,
    Lte,
    /// Column value is one of the elements of the filter value (an array).
    In,
    /// Column value is none of the elements of the filter value (an array).
    NotIn,
    /// Array column contains the filter value (scalar, or all elements of an
    /// array value).
    Contains,
}

/// A single filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    fn new(column: impl Into<String>, op: FilterOp, value: Value) -> Self {
        Self {
            column: column.into(),
            op,
            value,
        }
    }

    pub fn eq(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, FilterOp::Eq, value)
    }

    pub fn neq(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, FilterOp::Neq, value)
    }

    pub fn gte(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, FilterOp::Gte, value)
    }

    pub fn lte(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, FilterOp::Lte, value)
    }

    pub fn is_in(column: impl Into<String>, values: Value) -> Self {
        Self::new(column, FilterOp::In, values)
    }

    pub fn not_in(column: impl Into<String>, values: Value) -> Self {
        Self::new(column, FilterOp::NotIn, values)
    }

    pub fn contains(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, FilterOp::Contains, value)
    }
}

/// Sort key for select operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }
}

/// One typed operation against a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Select {
        filters: Vec<Filter>,
        order: Option<OrderBy>,
        limit: Option<usize>,
        offset: Option<usize>,
    },
    Insert {
        rows: Vec<Value>,
    },
    Update {
        filters: Vec<Filter>,
        patch: Value,
    },
    Upsert {
        rows: Vec<Value>,
        /// Columns forming the conflict target; matching rows are replaced.
        conflict_target: Vec<String>,
    },
    Delete {
        filters: Vec<Filter>,
    },
}

/// A request addressed to one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRequest {
    pub collection: String,
    pub operation: Operation,
}

impl StoreRequest {
    pub fn select(collection: impl Into<String>, filters: Vec<Filter>) -> Self {
        Self {
            collection: collection.into(),
            operation: Operation::Select {
                filters,
                order: None,
                limit: None,
                offset: None,
            },
        }
    }

    /// Set the sort key of a select. No effect on other operations.
    pub fn order(mut self, order: OrderBy) -> Self {
        if let Operation::Select { order: slot, .. } = &mut self.operation {
            *slot = Some(order);
        }
        self
    }

    /// Set pagination of a select. No effect on other operations.
    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        if let Operation::Select { limit: l, offset: o, .. } = &mut self.operation {
            *l = Some(limit);
            *o = Some(offset);
        }
        self
    }

    pub fn insert(collection: impl Into<String>, rows: Vec<Value>) -> Self {
        Self {
            collection: collection.into(),
            operation: Operation::Insert { rows },
        }
    }

    pub fn update(collection: impl Into<String>, filters: Vec<Filter>, patch: Value) -> Self {
        Self {
            collection: collection.into(),
            operation: Operation::Update { filters, patch },
        }
    }

    pub fn upsert(
        collection: impl Into<String>,
        rows: Vec<Value>,
        conflict_target: Vec<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            operation: Operation::Upsert { rows, conflict_target },
        }
    }

    pub fn delete(collection: impl Into<String>, filters: Vec<Filter>) -> Self {
        Self {
            collection: collection.into(),
            operation: Operation::Delete { filters },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_builder() {
        let req = StoreRequest::select("profiles", vec![Filter::eq("id", json!("u-1"))])
            .order(OrderBy::descending("last_active"))
            .page(20, 40);

        match req.operation {
            Operation::Select { filters, order, limit, offset } => {
                assert_eq!(filters.len(), 1);
                assert_eq!(order, Some(OrderBy::descending("last_active")));
                assert_eq!(limit, Some(20));
                assert_eq!(offset, Some(40));
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn test_requests_are_cloneable() {
        let req = StoreRequest::insert("swipes", vec![json!({"actor_id": "a"})]);
        assert_eq!(req.clone(), req);
    }
}
