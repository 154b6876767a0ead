//! Liveness check.

use minha_api_core::{EndpointDoc, HttpMethod};

/// Liveness health check endpoint.
///
/// The service has no downstream dependencies, so liveness is readiness.
pub async fn health() -> &'static str {
    "ok"
}

/// Schema entry for [`health`].
#[must_use]
pub fn health_doc() -> EndpointDoc {
    EndpointDoc::new(HttpMethod::Get, "Liveness check")
        .operation_id("health")
        .tag("ops")
        .response(200, "Service is running")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_returns_ok() {
        assert_eq!(health().await, "ok");
    }

    #[test]
    fn test_health_doc_is_get() {
        let doc = health_doc();
        assert_eq!(doc.method, HttpMethod::Get);
        assert_eq!(doc.responses, vec![(200, "Service is running".to_string())]);
    }
}
