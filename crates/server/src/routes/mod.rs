//! Route table.
//!
//! # Route Structure
//!
//! ```text
//! ANY  /admin/     - Admin site (bearer token); /admin redirects here
//! GET  /swagger/   - Swagger UI       (?format=openapi[.json|.yaml] for the schema)
//! GET  /redoc/     - ReDoc reference  (?format=openapi[.json|.yaml] for the schema)
//! ANY  /           - 302 to the Swagger UI
//! GET  /health     - Liveness check
//! ```
//!
//! Bindings are declared in order in [`urlpatterns`]. [`RouteTable::build`]
//! validates names and turns the table into an axum `Router` plus the
//! [`RouteIndex`] used for reverse lookup and schema generation.

pub mod admin;
pub mod health;
pub mod redirect;

use std::sync::Arc;

use axum::{
    Router,
    routing::{MethodRouter, get},
};
use minha_api_core::{
    EndpointDoc, RouteEntry, RouteError, RouteIndex, RouteKind, RouteName, UiKind,
};

pub use admin::{AdminMount, AdminSite};
pub use redirect::RootRedirect;

use crate::config::ServerConfig;
use crate::docs::DocsView;
use crate::schema::SchemaDescriptor;
use crate::state::AppState;

/// Name of the admin index.
pub const ADMIN_INDEX: &str = "admin:index";
/// Name of the Swagger UI view.
pub const SCHEMA_SWAGGER_UI: &str = "schema-swagger-ui";
/// Name of the ReDoc view.
pub const SCHEMA_REDOC: &str = "schema-redoc";
/// Name of the liveness check.
pub const HEALTH: &str = "health";

/// What a binding dispatches to.
pub enum RouteTarget {
    /// A handler registered at exactly the binding's pattern.
    Handler(MethodRouter<AppState>),
    /// A router whose routes already live under the binding's pattern.
    Mount(Router<AppState>),
}

/// One entry of the route table.
pub struct RouteBinding {
    pattern: String,
    name: Option<String>,
    docs: Vec<EndpointDoc>,
    requires: Vec<String>,
    target: RouteTarget,
}

impl RouteBinding {
    /// Bind a handler to `pattern`.
    pub fn handler(pattern: impl Into<String>, handler: MethodRouter<AppState>) -> Self {
        Self::new(pattern.into(), RouteTarget::Handler(handler))
    }

    /// Bind a mounted router to `pattern`.
    pub fn mount(pattern: impl Into<String>, router: Router<AppState>) -> Self {
        Self::new(pattern.into(), RouteTarget::Mount(router))
    }

    fn new(pattern: String, target: RouteTarget) -> Self {
        Self {
            pattern,
            name: None,
            docs: Vec::new(),
            requires: Vec::new(),
            target,
        }
    }

    /// Name the binding for reverse lookup.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Document an operation of the binding in the generated schema.
    #[must_use]
    pub fn doc(mut self, doc: EndpointDoc) -> Self {
        self.docs.push(doc);
        self
    }

    /// Declare that the binding needs the route named `name` to exist.
    #[must_use]
    pub fn requiring(mut self, name: impl Into<String>) -> Self {
        self.requires.push(name.into());
        self
    }

    /// The binding's pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The binding's name, if any.
    #[must_use]
    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn entry(&self) -> Result<RouteEntry, RouteError> {
        let kind = match self.target {
            RouteTarget::Handler(_) => RouteKind::Handler,
            RouteTarget::Mount(_) => RouteKind::Mount,
        };

        let mut entry = RouteEntry::new(self.pattern.clone(), kind);
        if let Some(name) = &self.name {
            entry = entry.with_name(RouteName::parse(name)?);
        }
        for doc in &self.docs {
            entry = entry.with_doc(doc.clone());
        }
        for required in &self.requires {
            entry = entry.requiring(RouteName::parse(required)?);
        }
        Ok(entry)
    }
}

/// Ordered collection of route bindings.
#[derive(Default)]
pub struct RouteTable {
    bindings: Vec<RouteBinding>,
}

impl RouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding.
    #[must_use]
    pub fn with(mut self, binding: RouteBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Remove the binding named `name`.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.bindings.retain(|b| b.route_name() != Some(name));
        self
    }

    /// Bindings in declaration order.
    pub fn bindings(&self) -> impl Iterator<Item = &RouteBinding> {
        self.bindings.iter()
    }

    /// Handler-free index of the table.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is invalid or duplicated, if two bindings
    /// overlap, or if a required name does not resolve.
    pub fn index(&self) -> Result<RouteIndex, RouteError> {
        let entries = self
            .bindings
            .iter()
            .map(RouteBinding::entry)
            .collect::<Result<Vec<_>, _>>()?;
        RouteIndex::new(entries)
    }

    /// Validate the table and assemble the router.
    ///
    /// Bindings are only handed to axum once the index is valid, so
    /// overlapping routes are reported instead of panicking.
    ///
    /// # Errors
    ///
    /// Same as [`RouteTable::index`].
    pub fn build(self) -> Result<(Router<AppState>, RouteIndex), RouteError> {
        let index = self.index()?;

        let router = self
            .bindings
            .into_iter()
            .fold(Router::new(), |router, binding| match binding.target {
                RouteTarget::Handler(handler) => router.route(&binding.pattern, handler),
                RouteTarget::Mount(mounted) => router.merge(mounted),
            });

        tracing::debug!(routes = index.len(), "Route table built");
        Ok((router, index))
    }
}

/// The service's route table.
///
/// Documentation views use the configured cache timeout, `0` unless
/// `DOCS_CACHE_TIMEOUT` says otherwise.
pub fn urlpatterns(
    config: &ServerConfig,
    descriptor: Arc<SchemaDescriptor>,
    admin: &dyn AdminMount,
) -> Result<RouteTable, RouteError> {
    let cache_timeout = config.docs_cache_timeout;
    let redirect = RootRedirect::to_route(RouteName::parse(SCHEMA_SWAGGER_UI)?);

    Ok(RouteTable::new()
        .with(RouteBinding::mount("/admin/", admin.router("/admin/")).name(ADMIN_INDEX))
        .with(
            RouteBinding::handler(
                "/swagger/",
                DocsView::with_ui(Arc::clone(&descriptor), UiKind::Interactive, cache_timeout),
            )
            .name(SCHEMA_SWAGGER_UI),
        )
        .with(
            RouteBinding::handler(
                "/redoc/",
                DocsView::with_ui(descriptor, UiKind::Reference, cache_timeout),
            )
            .name(SCHEMA_REDOC),
        )
        .with(RouteBinding::handler("/", redirect.into_method_router()).requiring(SCHEMA_SWAGGER_UI))
        .with(
            RouteBinding::handler("/health", get(health::health))
                .name(HEALTH)
                .doc(health::health_doc()),
        ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{StatusCode, header::LOCATION};
    use axum_test::TestServer;
    use minha_api_core::{HttpMethod, RouteNameError};

    use super::*;
    use crate::schema::{DenyAll, minha_api};

    fn table() -> RouteTable {
        urlpatterns(
            &ServerConfig::default(),
            Arc::new(minha_api()),
            &AdminSite::new(DenyAll),
        )
        .unwrap()
    }

    fn server(table: RouteTable) -> TestServer {
        let (router, index) = table.build().unwrap();
        let app = router.with_state(AppState::new(ServerConfig::default(), index));
        TestServer::new(app).unwrap()
    }

    #[test]
    fn test_urlpatterns_order_and_names() {
        let index = table().index().unwrap();
        let rows: Vec<_> = index
            .entries()
            .map(|e| (e.pattern().to_string(), e.name().map(ToString::to_string)))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("/admin/".to_string(), Some("admin:index".to_string())),
                ("/swagger/".to_string(), Some("schema-swagger-ui".to_string())),
                ("/redoc/".to_string(), Some("schema-redoc".to_string())),
                ("/".to_string(), None),
                ("/health".to_string(), Some("health".to_string())),
            ]
        );
        assert_eq!(index.reverse(SCHEMA_SWAGGER_UI).unwrap(), "/swagger/");
    }

    #[test]
    fn test_only_health_is_documented() {
        let index = table().index().unwrap();
        let documented: Vec<_> = index.documented().map(RouteEntry::pattern).collect();
        assert_eq!(documented, vec!["/health"]);
    }

    #[test]
    fn test_removing_swagger_ui_fails_build() {
        let result = table().without(SCHEMA_SWAGGER_UI).build();

        match result {
            Err(RouteError::UnresolvedName { name, .. }) => {
                assert_eq!(name.as_str(), SCHEMA_SWAGGER_UI);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("build should fail"),
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = table()
            .with(RouteBinding::handler("/other", get(health::health)).name(HEALTH))
            .index();

        assert!(matches!(result, Err(RouteError::DuplicateName(_))));
    }

    #[test]
    fn test_overlapping_patterns_fail_build() {
        let result = table()
            .with(RouteBinding::handler("/swagger/", get(|| async { "shadow" })))
            .build();
        assert!(matches!(
            result,
            Err(RouteError::DuplicatePattern(ref p)) if p == "/swagger/"
        ));

        let result = table()
            .with(RouteBinding::handler("/admin/users", get(|| async { "users" })))
            .build();
        assert!(matches!(result, Err(RouteError::DuplicatePattern(_))));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let result = RouteTable::new()
            .with(RouteBinding::handler("/x", get(health::health)).name("bad name"))
            .index();

        assert_eq!(
            result.unwrap_err(),
            RouteError::InvalidName(RouteNameError::InvalidChar(' '))
        );
    }

    #[tokio::test]
    async fn test_root_redirects_to_swagger() {
        let response = server(table()).get("/").await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/swagger/");
    }

    #[tokio::test]
    async fn test_root_redirects_any_method() {
        let server = server(table());

        let response = server.post("/").await;
        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/swagger/");

        let response = server.delete("/").await;
        assert_eq!(response.status_code(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_docs_views_render_metadata() {
        let server = server(table());

        for path in ["/swagger/", "/redoc/"] {
            let response = server.get(path).await;
            assert_eq!(response.status_code(), StatusCode::OK);
            let body = response.text();
            assert!(body.contains("Minha API"), "{path}");
            assert!(body.contains("v1"), "{path}");
        }

        assert!(server.get("/redoc/").await.text().contains("redoc.standalone.js"));
    }

    #[tokio::test]
    async fn test_health_and_unmatched() {
        let server = server(table());

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "ok");

        let response = server.get("/nope").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_closed_without_token() {
        let response = server(table()).get("/admin/").await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_added_route_is_documented() {
        let table = table().with(
            RouteBinding::handler("/reports", get(|| async { "[]" }))
                .name("reports")
                .doc(EndpointDoc::new(HttpMethod::Get, "List reports")),
        );

        let response = server(table)
            .get("/swagger/")
            .add_query_param("format", "openapi")
            .await;

        let json: serde_json::Value = response.json();
        assert!(json["paths"]["/reports"]["get"].is_object());
        assert!(json["paths"]["/health"]["get"].is_object());
    }
}
