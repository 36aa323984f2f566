//! Application state shared across handlers.

use std::sync::Arc;

use zeidan_sheets::{CachedStore, TableStore};

use crate::config::AdminConfig;
use crate::services::PasswordVerifier;

/// Application state shared across all handlers.
///
/// Cheap to clone: everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn TableStore>,
    verifier: PasswordVerifier,
}

impl AppState {
    /// Build the state around `store`, wrapping it in a read-through cache
    /// with the configured time-to-live.
    #[must_use]
    pub fn new(config: AdminConfig, store: Arc<dyn TableStore>) -> Self {
        let store: Arc<dyn TableStore> = Arc::new(CachedStore::new(store, config.cache_ttl));
        let verifier = PasswordVerifier::new(&config.password, config.session_secret.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                verifier,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The cached spreadsheet store.
    #[must_use]
    pub fn store(&self) -> &dyn TableStore {
        self.inner.store.as_ref()
    }

    #[must_use]
    pub fn verifier(&self) -> &PasswordVerifier {
        &self.inner.verifier
    }
}
