//! Engine handle shared by the feed and lifecycle operations.

use std::sync::Arc;

use matchstore::StoreClient;

use crate::config::MatchmakerConfig;
use crate::notify::{LogNotifier, Notifier};

/// The matching engine. Cheap to clone; all state lives behind the store
/// client and the notifier.
#[derive(Clone)]
pub struct Matchmaker {
    pub(crate) store: StoreClient,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) config: MatchmakerConfig,
}

impl Matchmaker {
    /// Build an engine with the default log-only notifier.
    pub fn new(store: StoreClient, config: MatchmakerConfig) -> Self {
        Self {
            store,
            notifier: Arc::new(LogNotifier),
            config,
        }
    }

    /// Replace the notifier, e.g. with a recording double in tests.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    pub fn config(&self) -> &MatchmakerConfig {
        &self.config
    }
}
