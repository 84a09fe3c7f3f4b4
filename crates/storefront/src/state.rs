//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::Store;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; built once at startup and handed to the
/// router.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Store,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Store) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }
}
