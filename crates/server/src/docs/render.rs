//! HTML pages for the documentation UIs.

use askama::Template;
use minha_api_core::{ApiInfo, UiKind};

use super::introspect::OperationSummary;

/// Everything a documentation page shows.
#[derive(Debug, Clone, Copy)]
pub struct DocPage<'a> {
    pub info: &'a ApiInfo,
    /// URL the UI fetches the OpenAPI document from.
    pub spec_url: &'a str,
    /// Operations listed in the no-script fallback.
    pub operations: &'a [OperationSummary],
}

/// Renders a documentation page.
pub trait DocRenderer: Send + Sync {
    /// Render the page as HTML.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    fn render(&self, page: &DocPage<'_>) -> askama::Result<String>;
}

/// Swagger UI page.
#[derive(Template)]
#[template(path = "docs/swagger.html")]
struct SwaggerTemplate<'a> {
    title: &'a str,
    version: &'a str,
    description: &'a str,
    spec_url: &'a str,
    operations: &'a [OperationSummary],
}

/// ReDoc page.
#[derive(Template)]
#[template(path = "docs/redoc.html")]
struct RedocTemplate<'a> {
    title: &'a str,
    version: &'a str,
    description: &'a str,
    spec_url: &'a str,
    operations: &'a [OperationSummary],
}

/// Askama renderer for one [`UiKind`].
#[derive(Debug, Clone, Copy)]
pub struct TemplateRenderer {
    kind: UiKind,
}

impl TemplateRenderer {
    /// Renderer for `kind`.
    #[must_use]
    pub const fn new(kind: UiKind) -> Self {
        Self { kind }
    }
}

impl DocRenderer for TemplateRenderer {
    fn render(&self, page: &DocPage<'_>) -> askama::Result<String> {
        let DocPage {
            info,
            spec_url,
            operations,
        } = *page;

        match self.kind {
            UiKind::Interactive => SwaggerTemplate {
                title: info.title(),
                version: info.version(),
                description: info.description(),
                spec_url,
                operations,
            }
            .render(),
            UiKind::Reference => RedocTemplate {
                title: info.title(),
                version: info.version(),
                description: info.description(),
                spec_url,
                operations,
            }
            .render(),
        }
    }
}
