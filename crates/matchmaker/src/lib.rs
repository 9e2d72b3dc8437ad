//! Discovery feed and swipe/match lifecycle.
//!
//! The [`Matchmaker`] coordinates the read path (candidate retrieval,
//! exclusion computation, dealbreaker filtering, scoring, ranking) and the
//! write path (like/pass/undo, mutual-like detection, conflict-tolerant
//! match creation, best-effort notification). All persistence goes through
//! the resilient [`matchstore::StoreClient`]; notification delivery sits
//! behind the [`Notifier`] seam.

pub mod config;
pub mod engine;
pub mod error;
pub mod exclusions;
pub mod feed;
pub mod lifecycle;
pub mod notify;

pub use config::MatchmakerConfig;
pub use engine::Matchmaker;
pub use error::MatchmakerError;
pub use exclusions::ExclusionSet;
pub use feed::FeedEntry;
pub use lifecycle::SwipeOutcome;
pub use notify::{LogNotifier, NotifyError, Notifier};
