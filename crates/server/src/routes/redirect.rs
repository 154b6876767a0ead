//! Root redirect.

use axum::{
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::{MethodRouter, any},
};
use minha_api_core::RouteName;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Redirects to the path of a named route.
///
/// Every method is redirected. The target is resolved against the route
/// index on every request and answered with `302 Found`.
#[derive(Debug, Clone)]
pub struct RootRedirect {
    target: RouteName,
}

impl RootRedirect {
    /// Redirect to the route named `target`.
    #[must_use]
    pub const fn to_route(target: RouteName) -> Self {
        Self { target }
    }

    /// Name of the target route.
    #[must_use]
    pub const fn target(&self) -> &RouteName {
        &self.target
    }

    /// Resolve the target and build the redirect response.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Routing` if the target name is not in the index.
    #[instrument(skip(self, state), fields(target = %self.target))]
    pub fn handle(&self, state: &AppState) -> Result<Response> {
        let location = state.routes().reverse(self.target.as_str())?;
        Ok((StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response())
    }

    /// Convert into a handler for every method.
    #[must_use]
    pub fn into_method_router(self) -> MethodRouter<AppState> {
        any(move |State(state): State<AppState>| {
            let redirect = self.clone();
            async move { redirect.handle(&state) }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use minha_api_core::{RouteEntry, RouteIndex, RouteKind};

    use super::*;
    use crate::config::ServerConfig;

    fn name(s: &str) -> RouteName {
        RouteName::parse(s).unwrap()
    }

    fn server(routes: RouteIndex) -> TestServer {
        let app = Router::new()
            .route(
                "/",
                RootRedirect::to_route(name("schema-swagger-ui")).into_method_router(),
            )
            .with_state(AppState::new(ServerConfig::default(), routes));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_redirects_with_found_to_named_route() {
        let routes = RouteIndex::new(vec![
            RouteEntry::new("/swagger/", RouteKind::Handler).with_name(name("schema-swagger-ui")),
        ])
        .unwrap();

        let response = server(routes).get("/").await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/swagger/");
    }

    #[tokio::test]
    async fn test_redirects_non_get_methods() {
        let routes = RouteIndex::new(vec![
            RouteEntry::new("/swagger/", RouteKind::Handler).with_name(name("schema-swagger-ui")),
        ])
        .unwrap();
        let server = server(routes);

        for response in [
            server.post("/").await,
            server.put("/").await,
            server.patch("/").await,
        ] {
            assert_eq!(response.status_code(), StatusCode::FOUND);
            assert_eq!(response.headers().get(LOCATION).unwrap(), "/swagger/");
        }
    }

    #[tokio::test]
    async fn test_follows_renamed_path() {
        let routes = RouteIndex::new(vec![
            RouteEntry::new("/docs/", RouteKind::Handler).with_name(name("schema-swagger-ui")),
        ])
        .unwrap();

        let response = server(routes).get("/").await;

        assert_eq!(response.headers().get(LOCATION).unwrap(), "/docs/");
    }

    #[tokio::test]
    async fn test_missing_target_is_server_error() {
        let response = server(RouteIndex::default()).get("/").await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(LOCATION).is_none());
    }
}
