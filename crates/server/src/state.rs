//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::UserStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store is constructed once at
/// startup and injected here; handlers never reach it any other way.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    users: Arc<dyn UserStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `users` - User store shared by every request
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { users }),
        }
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }
}
