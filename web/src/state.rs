//! Application state for Axum handlers.

use crate::session::SessionStore;
use std::sync::Arc;

/// State shared by every handler: the storage backend and the session table.
///
/// Generic over the backend so tests can run the full router against an
/// in-memory store.
pub struct AppState<S> {
    /// Data access
    pub store: Arc<S>,
    /// Session table
    pub sessions: SessionStore,
}

impl<S> AppState<S> {
    /// Create state with an empty session table.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_sessions(store, SessionStore::new())
    }

    /// Create state around an existing session table.
    #[must_use]
    pub fn with_sessions(store: S, sessions: SessionStore) -> Self {
        Self {
            store: Arc::new(store),
            sessions,
        }
    }
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sessions: self.sessions.clone(),
        }
    }
}
