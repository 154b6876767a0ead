//! OpenAPI generation from the route index.

use minha_api_core::{EndpointDoc, HttpMethod, RouteIndex};
use url::Url;
use utoipa::openapi::info::InfoBuilder;
use utoipa::openapi::path::{
    HttpMethod as OpenApiMethod, Operation, OperationBuilder, PathItem, PathsBuilder,
};
use utoipa::openapi::response::ResponseBuilder;
use utoipa::openapi::server::Server;
use utoipa::openapi::{OpenApi, OpenApiBuilder};

use crate::schema::SchemaDescriptor;

/// Request-dependent inputs to schema generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaScope<'a> {
    /// Whether the requesting client presented credentials.
    pub authenticated: bool,
    /// Public base URL to advertise as the server.
    pub server_url: Option<&'a Url>,
}

/// Builds an OpenAPI document describing the routes of the service.
pub trait SchemaIntrospector: Send + Sync {
    /// Generate the document for `routes` using the descriptor's metadata.
    fn generate(
        &self,
        descriptor: &SchemaDescriptor,
        routes: &RouteIndex,
        scope: &SchemaScope<'_>,
    ) -> OpenApi;
}

/// Introspector that documents every route carrying [`EndpointDoc`]s.
///
/// Routes whose pattern cannot be expressed as an OpenAPI path are skipped
/// with a warning; the remaining routes are still documented.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteIntrospector;

impl SchemaIntrospector for RouteIntrospector {
    fn generate(
        &self,
        descriptor: &SchemaDescriptor,
        routes: &RouteIndex,
        scope: &SchemaScope<'_>,
    ) -> OpenApi {
        let info = descriptor.info();
        let mut paths = PathsBuilder::new();

        for entry in routes.documented() {
            let path = match openapi_path(entry.pattern()) {
                Ok(path) => path,
                Err(reason) => {
                    tracing::warn!(
                        pattern = entry.pattern(),
                        reason,
                        "Skipping route in generated schema"
                    );
                    continue;
                }
            };

            for doc in entry.docs() {
                // Non-public schemas only show protected operations to
                // authenticated callers.
                if doc.requires_auth && !descriptor.is_public() && !scope.authenticated {
                    continue;
                }
                paths = paths.path(path, PathItem::new(openapi_method(doc.method), operation(doc)));
            }
        }

        let mut builder = OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title(info.title())
                    .version(info.version())
                    .description(Some(info.description()))
                    .build(),
            )
            .paths(paths.build());

        if let Some(url) = scope.server_url {
            builder = builder.servers(Some(vec![Server::new(url.as_str())]));
        }

        builder.build()
    }
}

/// Validate that a route pattern is usable as an OpenAPI path.
fn openapi_path(pattern: &str) -> Result<&str, &'static str> {
    if !pattern.starts_with('/') {
        return Err("pattern is not absolute");
    }
    if pattern.contains("{*") {
        return Err("catch-all segments have no OpenAPI equivalent");
    }
    Ok(pattern)
}

const fn openapi_method(method: HttpMethod) -> OpenApiMethod {
    match method {
        HttpMethod::Get => OpenApiMethod::Get,
        HttpMethod::Post => OpenApiMethod::Post,
        HttpMethod::Put => OpenApiMethod::Put,
        HttpMethod::Patch => OpenApiMethod::Patch,
        HttpMethod::Delete => OpenApiMethod::Delete,
        HttpMethod::Head => OpenApiMethod::Head,
        HttpMethod::Options => OpenApiMethod::Options,
    }
}

fn operation(doc: &EndpointDoc) -> Operation {
    let mut builder = OperationBuilder::new()
        .summary(Some(doc.summary.clone()))
        .description(doc.description.clone())
        .operation_id(doc.operation_id.clone())
        .tags(doc.tag.clone().map(|tag| vec![tag]));

    for (status, description) in &doc.responses {
        builder = builder.response(
            status.to_string(),
            ResponseBuilder::new().description(description.clone()).build(),
        );
    }

    builder.build()
}

/// One documented operation, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSummary {
    pub method: &'static str,
    pub path: String,
    pub summary: String,
}

/// Flatten a generated document into `(method, path, summary)` rows.
#[must_use]
pub fn summarize(openapi: &OpenApi) -> Vec<OperationSummary> {
    let mut rows = Vec::new();
    for (path, item) in &openapi.paths.paths {
        let operations = [
            ("GET", &item.get),
            ("POST", &item.post),
            ("PUT", &item.put),
            ("PATCH", &item.patch),
            ("DELETE", &item.delete),
            ("HEAD", &item.head),
            ("OPTIONS", &item.options),
        ];
        for (method, op) in operations {
            if let Some(op) = op {
                rows.push(OperationSummary {
                    method,
                    path: path.clone(),
                    summary: op.summary.clone().unwrap_or_default(),
                });
            }
        }
    }
    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use minha_api_core::{ApiInfo, RouteEntry, RouteKind, RouteName};

    use super::*;
    use crate::schema::minha_api;

    fn index(entries: Vec<RouteEntry>) -> RouteIndex {
        RouteIndex::new(entries).unwrap()
    }

    fn health_entry() -> RouteEntry {
        RouteEntry::new("/health", RouteKind::Handler)
            .with_name(RouteName::parse("health").unwrap())
            .with_doc(
                EndpointDoc::new(HttpMethod::Get, "Liveness check")
                    .operation_id("health")
                    .tag("ops")
                    .response(200, "Server is running"),
            )
    }

    #[test]
    fn test_generate_uses_descriptor_metadata() {
        let doc = RouteIntrospector.generate(&minha_api(), &index(vec![]), &SchemaScope::default());
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["info"]["title"], "Minha API");
        assert_eq!(json["info"]["version"], "v1");
        assert_eq!(json["info"]["description"], "Documentação interativa da API");
        assert!(json.get("servers").is_none());
    }

    #[test]
    fn test_generate_documents_only_described_routes() {
        let routes = index(vec![
            RouteEntry::new("/admin/", RouteKind::Mount),
            RouteEntry::new("/swagger/", RouteKind::Handler),
            health_entry(),
        ]);

        let doc = RouteIntrospector.generate(&minha_api(), &routes, &SchemaScope::default());
        let rows = summarize(&doc);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].method, "GET");
        assert_eq!(rows[0].path, "/health");
        assert_eq!(rows[0].summary, "Liveness check");

        let json = serde_json::to_value(&doc).unwrap();
        let op = &json["paths"]["/health"]["get"];
        assert_eq!(op["operationId"], "health");
        assert_eq!(op["tags"][0], "ops");
        assert_eq!(op["responses"]["200"]["description"], "Server is running");
    }

    #[test]
    fn test_generate_skips_unexpressible_routes_and_keeps_the_rest() {
        let routes = index(vec![
            RouteEntry::new("/files/{*path}", RouteKind::Handler)
                .with_doc(EndpointDoc::new(HttpMethod::Get, "Serve file")),
            health_entry(),
        ]);

        let doc = RouteIntrospector.generate(&minha_api(), &routes, &SchemaScope::default());
        let paths: Vec<_> = summarize(&doc).into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/health".to_string()]);
    }

    #[test]
    fn test_generate_merges_methods_on_same_path() {
        let routes = index(vec![
            RouteEntry::new("/items/{id}", RouteKind::Handler)
                .with_doc(EndpointDoc::new(HttpMethod::Get, "Fetch item"))
                .with_doc(EndpointDoc::new(HttpMethod::Delete, "Delete item")),
        ]);

        let doc = RouteIntrospector.generate(&minha_api(), &routes, &SchemaScope::default());
        let mut methods: Vec<_> = summarize(&doc).into_iter().map(|r| r.method).collect();
        methods.sort_unstable();
        assert_eq!(methods, vec!["DELETE", "GET"]);
    }

    #[test]
    fn test_non_public_schema_hides_protected_operations_from_anonymous() {
        let descriptor = SchemaDescriptor::new(ApiInfo::new("Private", "v2", "internal"));
        let routes = index(vec![
            health_entry(),
            RouteEntry::new("/reports", RouteKind::Handler).with_doc(
                EndpointDoc::new(HttpMethod::Get, "Reports").requires_auth(true),
            ),
        ]);

        let anonymous = RouteIntrospector.generate(&descriptor, &routes, &SchemaScope::default());
        assert_eq!(summarize(&anonymous).len(), 1);

        let scope = SchemaScope {
            authenticated: true,
            server_url: None,
        };
        let authenticated = RouteIntrospector.generate(&descriptor, &routes, &scope);
        assert_eq!(summarize(&authenticated).len(), 2);

        // Public schemas ignore the flag.
        let public = RouteIntrospector.generate(&minha_api(), &routes, &SchemaScope::default());
        assert_eq!(summarize(&public).len(), 2);
    }

    #[test]
    fn test_generate_advertises_server_url() {
        let url = Url::parse("https://api.example.com/").unwrap();
        let scope = SchemaScope {
            authenticated: false,
            server_url: Some(&url),
        };

        let doc = RouteIntrospector.generate(&minha_api(), &index(vec![]), &scope);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["servers"][0]["url"], "https://api.example.com/");
    }
}
