//! End-to-end tests for Minha API.
//!
//! Each test spawns the real application on an ephemeral port and talks to
//! it with `reqwest`, redirects disabled.
//!
//! ```bash
//! cargo test -p minha-api-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use minha_api_core::RouteError;
use minha_api_server::config::ServerConfig;
use minha_api_server::routes::RouteTable;
use reqwest::{Client, redirect::Policy};
use secrecy::SecretString;
use tokio::task::JoinHandle;

/// Admin token accepted by servers started with [`TestServer::with_admin_token`].
pub const ADMIN_TOKEN: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// A running server plus a client pointed at it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start the configured application with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn start() -> Self {
        Self::with_config(ServerConfig::default()).await
    }

    /// Start the configured application with the admin site open to
    /// [`ADMIN_TOKEN`].
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn with_admin_token() -> Self {
        Self::with_config(ServerConfig {
            admin_token: Some(SecretString::from(ADMIN_TOKEN)),
            ..ServerConfig::default()
        })
        .await
    }

    /// Start the configured application with `config`.
    ///
    /// # Panics
    ///
    /// Panics if the route table is invalid or the server cannot be started.
    pub async fn with_config(config: ServerConfig) -> Self {
        let app = minha_api_server::build_app(config).expect("valid route table");
        Self::serve(app).await
    }

    /// Start an application built from `table`.
    ///
    /// # Errors
    ///
    /// Returns the table's validation error instead of starting a server.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn from_table(table: RouteTable) -> Result<Self, RouteError> {
        let app = minha_api_server::app_from_table(ServerConfig::default(), table)?;
        Ok(Self::serve(app).await)
    }

    async fn serve(app: axum::Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server error");
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("build HTTP client");

        Self {
            addr,
            client,
            handle,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
