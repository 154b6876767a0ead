//! Admin mount.
//!
//! The service delegates `/admin/` to an [`AdminMount`]. The built-in
//! [`AdminSite`] serves a read-only index of the route table, guarded by a
//! bearer token.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::any,
};
use minha_api_core::RouteEntry;
use tracing::instrument;

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::schema::{AccessPolicy, BearerToken, DenyAll};
use crate::state::AppState;

/// An admin application that can be mounted under a path prefix.
pub trait AdminMount: Send + Sync {
    /// Build the router serving the admin application at `prefix`.
    ///
    /// `prefix` is absolute and ends with `/`. The router may also claim any
    /// path below `prefix` and `prefix` without its trailing slash.
    fn router(&self, prefix: &str) -> Router<AppState>;
}

/// Built-in admin site listing the route table.
#[derive(Clone)]
pub struct AdminSite {
    policy: Arc<dyn AccessPolicy>,
}

impl AdminSite {
    /// Admin site guarded by `policy`.
    #[must_use]
    pub fn new(policy: impl AccessPolicy + 'static) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Admin site guarded by `ADMIN_TOKEN`, or closed if it is unset.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        match &config.admin_token {
            Some(token) => Self::new(BearerToken::new(token.clone())),
            None => {
                tracing::warn!("ADMIN_TOKEN not set, admin site is disabled");
                Self::new(DenyAll)
            }
        }
    }
}

impl AdminMount for AdminSite {
    fn router(&self, prefix: &str) -> Router<AppState> {
        let policy = Arc::clone(&self.policy);
        let router = Router::new().route(
            prefix,
            any(move |State(state): State<AppState>, headers: HeaderMap| {
                let policy = Arc::clone(&policy);
                async move { index(&state, policy.as_ref(), &headers) }
            }),
        );

        let bare = prefix.trim_end_matches('/');
        if bare.is_empty() {
            return router;
        }

        let location = prefix.to_string();
        router.route(
            bare,
            any(move || {
                let location = location.clone();
                async move { (StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]) }
            }),
        )
    }
}

/// One row of the admin route listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    pub pattern: String,
    pub name: String,
    pub kind: &'static str,
    pub operations: String,
}

impl From<&RouteEntry> for RouteRow {
    fn from(entry: &RouteEntry) -> Self {
        let operations = entry
            .docs()
            .iter()
            .map(|doc| doc.method.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            pattern: entry.pattern().to_string(),
            name: entry
                .name()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            kind: entry.kind().as_str(),
            operations,
        }
    }
}

/// Admin index page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminIndexTemplate {
    pub site_title: &'static str,
    pub site_header: &'static str,
    pub rows: Vec<RouteRow>,
}

#[instrument(skip_all)]
fn index(state: &AppState, policy: &dyn AccessPolicy, headers: &HeaderMap) -> Result<Response> {
    if !policy.has_permission(headers) {
        return Err(AppError::Forbidden(policy.denial_message().to_string()));
    }

    Ok(AdminIndexTemplate {
        site_title: "Site administration | Minha API",
        site_header: "Minha API administration",
        rows: state.routes().entries().map(RouteRow::from).collect(),
    }
    .into_response())
}
