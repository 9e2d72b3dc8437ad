//! In-memory session state.

use std::sync::RwLock;

/// Supplies the short-lived access token from in-memory state.
///
/// The hot path must never re-read credentials from disk or the network;
/// whoever authenticates the session refreshes the token here.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Session context for the current authenticated user.
#[derive(Debug)]
pub struct SessionContext {
    user_id: String,
    token: RwLock<Option<String>>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: RwLock::new(None),
        }
    }

    pub fn with_token(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Replace the access token after a session refresh.
    pub fn set_token(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.into());
        }
    }

    /// Drop the token, e.g. on sign-out.
    pub fn clear_token(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }
}

impl TokenProvider for SessionContext {
    fn access_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }
}
