//! Minha API server library.
//!
//! The service is a route table: an admin mount, two documentation views over
//! a schema generated from the table itself, a root redirect and a liveness
//! check. Exposed as a library so the CLI and integration tests can build the
//! same application.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod docs;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware as axum_middleware};
use minha_api_core::RouteError;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use config::ServerConfig;
use routes::{AdminSite, RouteTable};
use state::AppState;

/// Build the configured application.
///
/// # Errors
///
/// Returns an error if the route table is misconfigured.
pub fn build_app(config: ServerConfig) -> Result<Router, RouteError> {
    let admin = AdminSite::from_config(&config);
    let table = routes::urlpatterns(&config, Arc::new(schema::minha_api()), &admin)?;
    app_from_table(config, table)
}

/// Build an application from an arbitrary route table.
///
/// # Errors
///
/// Returns an error if the route table is misconfigured.
pub fn app_from_table(config: ServerConfig, table: RouteTable) -> Result<Router, RouteError> {
    let (router, index) = table.build()?;
    let state = AppState::new(config, index);

    Ok(router
        .layer(axum_middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                        request_id = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state))
}
