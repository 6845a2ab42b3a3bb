//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::CustomerStore;
use crate::services::CustomerService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and whichever
/// customer store was selected at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    store: Arc<dyn CustomerStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, store: Arc<dyn CustomerStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the customer store.
    #[must_use]
    pub fn store(&self) -> &dyn CustomerStore {
        self.inner.store.as_ref()
    }

    /// A customer service over the configured store.
    #[must_use]
    pub fn customers(&self) -> CustomerService<'_> {
        CustomerService::new(self.store())
    }
}
