//! Security headers middleware.
//!
//! The documentation pages load Swagger UI and ReDoc bundles from public CDNs
//! and bootstrap them with a small inline script, so the CSP allows exactly
//! those origins. Caching is left to the handlers.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// Content Security Policy applied to every response.
///
/// ```text
/// default-src 'none';
/// script-src 'self' 'unsafe-inline' https://unpkg.com https://cdn.redoc.ly;
/// style-src 'self' 'unsafe-inline' https://unpkg.com https://fonts.googleapis.com;
/// font-src 'self' https://fonts.gstatic.com;
/// img-src 'self' data: https://cdn.redoc.ly;
/// connect-src 'self';
/// worker-src 'self' blob:;
/// object-src 'none';
/// base-uri 'self';
/// form-action 'self';
/// frame-ancestors 'none'
/// ```
pub const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'none'; \
     script-src 'self' 'unsafe-inline' https://unpkg.com https://cdn.redoc.ly; \
     style-src 'self' 'unsafe-inline' https://unpkg.com https://fonts.googleapis.com; \
     font-src 'self' https://fonts.gstatic.com; \
     img-src 'self' data: https://cdn.redoc.ly; \
     connect-src 'self'; \
     worker-src 'self' blob:; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: same-origin`
/// - `Content-Security-Policy` - see [`CONTENT_SECURITY_POLICY_VALUE`]
/// - `Cross-Origin-Opener-Policy: same-origin` - Process isolation
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, http::header::CACHE_CONTROL, middleware, routing::get};
    use axum_test::TestServer;

    use super::*;

    #[tokio::test]
    async fn test_headers_applied_without_touching_cache_control() {
        let app = Router::new()
            .route(
                "/",
                get(|| async { ([(CACHE_CONTROL, HeaderValue::from_static("max-age=60"))], "ok") }),
            )
            .layer(middleware::from_fn(security_headers_middleware));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/").await;
        let headers = response.headers();

        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert!(
            headers
                .get(CONTENT_SECURITY_POLICY)
                .unwrap()
                .to_str()
                .unwrap()
                .contains("https://unpkg.com")
        );
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "max-age=60");
    }
}
