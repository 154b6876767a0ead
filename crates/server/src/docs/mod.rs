//! Documentation views.
//!
//! [`DocsView::with_ui`] turns a [`SchemaDescriptor`] into a GET handler that
//! serves either a documentation page (Swagger UI or ReDoc) or the OpenAPI
//! document itself:
//!
//! ```text
//! GET /swagger/                      - Swagger UI page
//! GET /swagger/?format=openapi       - OpenAPI document (JSON)
//! GET /swagger/?format=openapi.json  - OpenAPI document (JSON)
//! GET /swagger/?format=openapi.yaml  - OpenAPI document (YAML)
//! ```
//!
//! With a cache timeout of zero the document is rebuilt from the route index
//! on every request. Otherwise rendered bodies are kept in a TTL cache.

pub mod introspect;
pub mod render;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{
        HeaderMap, HeaderValue, Uri,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use minha_api_core::{CacheTimeout, UiKind};
use moka::future::Cache;
use serde::Deserialize;
use tracing::instrument;
use utoipa::openapi::OpenApi;

pub use introspect::{RouteIntrospector, SchemaIntrospector, SchemaScope};
pub use render::{DocPage, DocRenderer, TemplateRenderer};

use crate::error::{AppError, Result};
use crate::schema::{SchemaDescriptor, is_authenticated};
use crate::state::AppState;

/// Query parameters accepted by the documentation views.
#[derive(Debug, Default, Deserialize)]
pub struct DocsQuery {
    pub format: Option<String>,
}

/// Representation requested from a documentation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Html,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse the `format` query parameter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for unknown formats.
    pub fn from_query(format: Option<&str>) -> Result<Self> {
        match format {
            None | Some("") => Ok(Self::Html),
            Some("openapi" | "openapi.json") => Ok(Self::Json),
            Some("openapi.yaml") => Ok(Self::Yaml),
            Some(other) => Err(AppError::NotFound(format!("format '{other}'"))),
        }
    }

    /// Content type of the response body.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Json => "application/json",
            Self::Yaml => "application/yaml",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    format: OutputFormat,
    authenticated: bool,
}

/// A documentation view bound to one descriptor and UI.
#[derive(Clone)]
pub struct DocsView {
    inner: Arc<DocsViewInner>,
}

struct DocsViewInner {
    descriptor: Arc<SchemaDescriptor>,
    ui: UiKind,
    cache_timeout: CacheTimeout,
    introspector: Arc<dyn SchemaIntrospector>,
    renderer: Arc<dyn DocRenderer>,
    cache: Option<Cache<CacheKey, String>>,
}

impl DocsView {
    /// Build a view for `ui`, introspecting routes with [`RouteIntrospector`].
    #[must_use]
    pub fn new(descriptor: Arc<SchemaDescriptor>, ui: UiKind, cache_timeout: CacheTimeout) -> Self {
        Self::with_parts(
            descriptor,
            ui,
            cache_timeout,
            Arc::new(RouteIntrospector),
            Arc::new(TemplateRenderer::new(ui)),
        )
    }

    /// Build a view with a custom introspector and renderer.
    #[must_use]
    pub fn with_parts(
        descriptor: Arc<SchemaDescriptor>,
        ui: UiKind,
        cache_timeout: CacheTimeout,
        introspector: Arc<dyn SchemaIntrospector>,
        renderer: Arc<dyn DocRenderer>,
    ) -> Self {
        let cache = (!cache_timeout.is_disabled()).then(|| {
            Cache::builder()
                .max_capacity(16)
                .time_to_live(cache_timeout.as_duration())
                .build()
        });

        Self {
            inner: Arc::new(DocsViewInner {
                descriptor,
                ui,
                cache_timeout,
                introspector,
                renderer,
                cache,
            }),
        }
    }

    /// Build the GET handler serving `ui` for `descriptor`.
    #[must_use]
    pub fn with_ui(
        descriptor: Arc<SchemaDescriptor>,
        ui: UiKind,
        cache_timeout: CacheTimeout,
    ) -> MethodRouter<AppState> {
        Self::new(descriptor, ui, cache_timeout).into_method_router()
    }

    /// Convert the view into a GET handler.
    #[must_use]
    pub fn into_method_router(self) -> MethodRouter<AppState> {
        get(
            move |State(state): State<AppState>,
                  Query(query): Query<DocsQuery>,
                  uri: Uri,
                  headers: HeaderMap| {
                let view = self.clone();
                async move { view.respond(&state, query, &uri, &headers).await }
            },
        )
    }

    /// The UI this view renders.
    #[must_use]
    pub fn ui(&self) -> UiKind {
        self.inner.ui
    }

    #[instrument(skip_all, fields(ui = %self.inner.ui, format = ?query.format))]
    async fn respond(
        &self,
        state: &AppState,
        query: DocsQuery,
        uri: &Uri,
        headers: &HeaderMap,
    ) -> Result<Response> {
        let descriptor = &self.inner.descriptor;
        if !descriptor.has_permission(headers) {
            return Err(AppError::Forbidden(descriptor.denial_message().to_string()));
        }

        let format = OutputFormat::from_query(query.format.as_deref())?;
        let authenticated = is_authenticated(headers);

        let body = match &self.inner.cache {
            None => self.generate(state, format, uri.path(), authenticated)?,
            Some(cache) => {
                let key = CacheKey {
                    format,
                    authenticated,
                };
                cache
                    .try_get_with(key, async {
                        tracing::debug!("Documentation cache miss");
                        self.generate(state, format, uri.path(), authenticated)
                    })
                    .await
                    .map_err(|e| AppError::Internal(e.to_string()))?
            }
        };

        Ok((
            [
                (CONTENT_TYPE, HeaderValue::from_static(format.content_type())),
                (CACHE_CONTROL, self.cache_control()),
            ],
            body,
        )
            .into_response())
    }

    fn generate(
        &self,
        state: &AppState,
        format: OutputFormat,
        path: &str,
        authenticated: bool,
    ) -> Result<String> {
        let openapi = self.openapi(state, authenticated);

        match format {
            OutputFormat::Html => {
                let spec_url = format!("{path}?format=openapi");
                let operations = introspect::summarize(&openapi);
                let page = DocPage {
                    info: self.inner.descriptor.info(),
                    spec_url: &spec_url,
                    operations: &operations,
                };
                Ok(self.inner.renderer.render(&page)?)
            }
            OutputFormat::Json => Ok(openapi.to_pretty_json()?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(&openapi)?),
        }
    }

    fn openapi(&self, state: &AppState, authenticated: bool) -> OpenApi {
        let scope = SchemaScope {
            authenticated,
            server_url: state.config().base_url.as_ref(),
        };
        self.inner
            .introspector
            .generate(&self.inner.descriptor, state.routes(), &scope)
    }

    fn cache_control(&self) -> HeaderValue {
        if self.inner.cache_timeout.is_disabled() {
            return HeaderValue::from_static("no-cache, no-store, must-revalidate, max-age=0");
        }
        HeaderValue::from_str(&format!("max-age={}", self.inner.cache_timeout.as_secs()))
            .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
    }
}
