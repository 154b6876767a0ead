//! Schema descriptor and access policies for the documentation views.

use std::fmt;
use std::sync::Arc;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use minha_api_core::ApiInfo;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// Title shown by the documentation views.
pub const API_TITLE: &str = "Minha API";
/// Version shown by the documentation views.
pub const API_VERSION: &str = "v1";
/// Description shown by the documentation views.
pub const API_DESCRIPTION: &str = "Documentação interativa da API";

/// Decides whether a request may use a view.
pub trait AccessPolicy: Send + Sync {
    /// Returns `true` if the request is allowed.
    fn has_permission(&self, headers: &HeaderMap) -> bool;

    /// Message returned with the 403 response when permission is denied.
    fn denial_message(&self) -> &'static str {
        "You do not have permission to perform this action."
    }
}

/// Allows every request, with or without credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAny;

impl AccessPolicy for AllowAny {
    fn has_permission(&self, _headers: &HeaderMap) -> bool {
        true
    }
}

/// Allows requests that carry an `Authorization` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsAuthenticated;

impl AccessPolicy for IsAuthenticated {
    fn has_permission(&self, headers: &HeaderMap) -> bool {
        is_authenticated(headers)
    }

    fn denial_message(&self) -> &'static str {
        "Authentication credentials were not provided."
    }
}

/// Denies every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl AccessPolicy for DenyAll {
    fn has_permission(&self, _headers: &HeaderMap) -> bool {
        false
    }

    fn denial_message(&self) -> &'static str {
        "Access is not configured."
    }
}

/// Allows requests presenting `Authorization: Bearer <token>` for a fixed token.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Create a policy accepting `token`.
    #[must_use]
    pub const fn new(token: SecretString) -> Self {
        Self(token)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

impl AccessPolicy for BearerToken {
    fn has_permission(&self, headers: &HeaderMap) -> bool {
        let Some(presented) = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
        else {
            return false;
        };

        presented
            .as_bytes()
            .ct_eq(self.0.expose_secret().as_bytes())
            .into()
    }

    fn denial_message(&self) -> &'static str {
        "Invalid or missing bearer token."
    }
}

/// Returns `true` if the request carries an `Authorization` header.
#[must_use]
pub fn is_authenticated(headers: &HeaderMap) -> bool {
    headers.contains_key(AUTHORIZATION)
}

/// Immutable description of the documented API.
///
/// Built once at startup and shared by the documentation views.
#[derive(Clone)]
pub struct SchemaDescriptor {
    info: ApiInfo,
    public: bool,
    policy: Arc<dyn AccessPolicy>,
}

impl SchemaDescriptor {
    /// Describe an API. Not public, open to any request.
    #[must_use]
    pub fn new(info: ApiInfo) -> Self {
        Self {
            info,
            public: false,
            policy: Arc::new(AllowAny),
        }
    }

    /// Public schemas list every documented operation regardless of who asks.
    #[must_use]
    pub const fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Set the policy guarding the documentation views.
    #[must_use]
    pub fn permission(mut self, policy: impl AccessPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// API metadata.
    #[must_use]
    pub const fn info(&self) -> &ApiInfo {
        &self.info
    }

    /// Whether the schema is public.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.public
    }

    /// Evaluate the access policy against a request.
    #[must_use]
    pub fn has_permission(&self, headers: &HeaderMap) -> bool {
        self.policy.has_permission(headers)
    }

    /// Denial message of the access policy.
    #[must_use]
    pub fn denial_message(&self) -> &'static str {
        self.policy.denial_message()
    }
}

impl fmt::Debug for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDescriptor")
            .field("info", &self.info)
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// The descriptor served by this service.
///
/// Public and open to any request.
// TODO: switch to `IsAuthenticated` once the API grows an authentication layer.
#[must_use]
pub fn minha_api() -> SchemaDescriptor {
    SchemaDescriptor::new(ApiInfo::new(API_TITLE, API_VERSION, API_DESCRIPTION))
        .public(true)
        .permission(AllowAny)
}
