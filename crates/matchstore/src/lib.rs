//! Resilient persistence client for the matching engine.
//!
//! All reads and writes go through a [`StoreClient`], which wraps a primary
//! [`StoreTransport`] with timeout, retry with exponential backoff, error
//! classification, and an optional low-level [`FallbackTransport`] used only
//! once the primary has exhausted its retry budget.
//!
//! Three transports are provided:
//!
//! - [`RestTransport`] - the primary, a PostgREST-style HTTP client
//! - [`DirectTransport`] - the fallback, a one-shot request path that must be
//!   handed the session token explicitly
//! - [`MemoryTransport`] - an in-memory double for tests and local
//!   development, enforcing the same uniqueness constraints the production
//!   store does
//!
//! On top of the client sit typed per-entity modules: [`profiles`],
//! [`swipes`], [`matches`], and [`blocks`].

pub mod blocks;
pub mod client;
pub mod direct;
pub mod error;
pub mod matches;
pub mod memory;
pub mod profiles;
pub mod request;
pub mod rest;
pub mod retry;
pub mod session;
pub mod swipes;
pub mod transport;

pub use client::StoreClient;
pub use direct::DirectTransport;
pub use error::{ErrorClass, Result, StoreError};
pub use memory::MemoryTransport;
pub use request::{Filter, FilterOp, Operation, OrderBy, StoreRequest};
pub use rest::RestTransport;
pub use retry::{with_retry, with_retry_and_fallback, RetryPolicy};
pub use session::{SessionContext, TokenProvider};
pub use transport::{FallbackTransport, StoreTransport};
