//! CLI command implementations.

pub mod routes;
pub mod schema;

use std::sync::Arc;

use minha_api_core::{RouteError, RouteIndex};
use minha_api_server::config::{ConfigError, ServerConfig};
use minha_api_server::routes::{AdminSite, urlpatterns};
use minha_api_server::schema::{DenyAll, minha_api};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The route table is misconfigured.
    #[error("Routing error: {0}")]
    Routing(#[from] RouteError),

    /// The document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for CommandError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Load server configuration from the environment.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
    ServerConfig::from_env()
}

/// Index of the served route table.
///
/// The admin mount only contributes its path, so it is built closed.
pub fn route_index(config: &ServerConfig) -> Result<RouteIndex, RouteError> {
    urlpatterns(config, Arc::new(minha_api()), &AdminSite::new(DenyAll))?.index()
}
