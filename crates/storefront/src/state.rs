//! Application state shared across handlers.

use std::sync::Arc;

use zeidan_sheets::{CachedStore, TableStore};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the spreadsheet store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn TableStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The store is wrapped in a read-through cache using the configured
    /// time-to-live, so a busy catalog does not exhaust the Sheets API quota.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn TableStore>) -> Self {
        let store: Arc<dyn TableStore> = Arc::new(CachedStore::new(store, config.cache_ttl));
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cached spreadsheet store.
    #[must_use]
    pub fn store(&self) -> &dyn TableStore {
        self.inner.store.as_ref()
    }
}
