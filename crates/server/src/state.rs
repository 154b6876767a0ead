//! Application state shared across handlers.

use std::sync::Arc;

use minha_api_core::RouteIndex;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the route index built at startup. Both are read-only
/// for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    routes: RouteIndex,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `routes` - Validated route index of the assembled route table
    #[must_use]
    pub fn new(config: ServerConfig, routes: RouteIndex) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, routes }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the route index.
    #[must_use]
    pub fn routes(&self) -> &RouteIndex {
        &self.inner.routes
    }
}
