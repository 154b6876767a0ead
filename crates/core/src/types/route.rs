//! Route names, endpoint documentation and the handler-free route index.
//!
//! The server builds its axum router from an ordered table of bindings. Each
//! binding also produces a [`RouteEntry`] describing it without the handler,
//! and the resulting [`RouteIndex`] is what reverse lookups and schema
//! introspection read at request time.

use core::fmt;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`RouteName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteNameError {
    /// The input string is empty.
    #[error("route name cannot be empty")]
    Empty,
    /// The input contains a character outside `[A-Za-z0-9_:-]`.
    #[error("route name contains invalid character '{0}'")]
    InvalidChar(char),
}

/// Errors raised while assembling or querying a route index.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Two bindings share the same name.
    #[error("route name '{0}' is declared more than once")]
    DuplicateName(RouteName),

    /// A binding refers to a name that no binding declares.
    #[error("route '{required_by}' refers to unknown route name '{name}'")]
    UnresolvedName {
        /// The missing name.
        name: RouteName,
        /// Pattern of the binding that needs it.
        required_by: String,
    },

    /// A binding was given a malformed name.
    #[error("invalid route name: {0}")]
    InvalidName(#[from] RouteNameError),

    /// Two entries would dispatch the same path.
    #[error("route pattern '{0}' overlaps an earlier route")]
    DuplicatePattern(String),

    /// Reverse lookup of a name that is not in the index.
    #[error("no route named '{0}'")]
    NoReverseMatch(String),
}

/// A unique route name used for reverse lookup.
///
/// ## Constraints
///
/// - Must not be empty
/// - ASCII alphanumerics, `-`, `_` and `:` only (`:` separates a namespace,
///   as in `admin:index`)
///
/// ## Examples
///
/// ```
/// use minha_api_core::RouteName;
///
/// assert!(RouteName::parse("schema-swagger-ui").is_ok());
/// assert!(RouteName::parse("admin:index").is_ok());
/// assert!(RouteName::parse("").is_err());
/// assert!(RouteName::parse("has space").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct RouteName(String);

impl RouteName {
    /// Parse a `RouteName` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains a character other
    /// than ASCII alphanumerics, `-`, `_` or `:`.
    pub fn parse(s: &str) -> Result<Self, RouteNameError> {
        if s.is_empty() {
            return Err(RouteNameError::Empty);
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')))
        {
            return Err(RouteNameError::InvalidChar(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RouteName {
    type Err = RouteNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RouteName {
    type Error = RouteNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RouteName> for String {
    fn from(name: RouteName) -> Self {
        name.0
    }
}

impl AsRef<str> for RouteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// HTTP methods an endpoint can be documented for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OpenAPI metadata for one operation exposed by a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDoc {
    /// HTTP method of the operation.
    pub method: HttpMethod,
    /// One-line summary.
    pub summary: String,
    /// Longer description.
    pub description: Option<String>,
    /// Stable operation identifier.
    pub operation_id: Option<String>,
    /// Grouping tag.
    pub tag: Option<String>,
    /// Hidden from non-public schemas unless the request is authenticated.
    pub requires_auth: bool,
    /// Documented responses as `(status, description)`.
    pub responses: Vec<(u16, String)>,
}

impl EndpointDoc {
    /// Document an operation with a method and summary.
    #[must_use]
    pub fn new(method: HttpMethod, summary: impl Into<String>) -> Self {
        Self {
            method,
            summary: summary.into(),
            description: None,
            operation_id: None,
            tag: None,
            requires_auth: false,
            responses: Vec::new(),
        }
    }

    /// Set the long description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the operation identifier.
    #[must_use]
    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Set the grouping tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Mark the operation as requiring authentication.
    #[must_use]
    pub const fn requires_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }

    /// Add a documented response.
    #[must_use]
    pub fn response(mut self, status: u16, description: impl Into<String>) -> Self {
        self.responses.push((status, description.into()));
        self
    }
}

/// Whether a binding dispatches to a handler or mounts a whole sub-router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Handler,
    Mount,
}

impl RouteKind {
    /// Lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Handler => "handler",
            Self::Mount => "mount",
        }
    }
}

/// Handler-free description of one route binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pattern: String,
    name: Option<RouteName>,
    kind: RouteKind,
    docs: Vec<EndpointDoc>,
    requires: Vec<RouteName>,
}

impl RouteEntry {
    /// Describe a binding at `pattern`.
    #[must_use]
    pub fn new(pattern: impl Into<String>, kind: RouteKind) -> Self {
        Self {
            pattern: pattern.into(),
            name: None,
            kind,
            docs: Vec::new(),
            requires: Vec::new(),
        }
    }

    /// Name the binding.
    #[must_use]
    pub fn with_name(mut self, name: RouteName) -> Self {
        self.name = Some(name);
        self
    }

    /// Attach operation documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: EndpointDoc) -> Self {
        self.docs.push(doc);
        self
    }

    /// Declare that the binding's handler reverses `name` at request time.
    #[must_use]
    pub fn requiring(mut self, name: RouteName) -> Self {
        self.requires.push(name);
        self
    }

    /// The path pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The binding name, if any.
    #[must_use]
    pub const fn name(&self) -> Option<&RouteName> {
        self.name.as_ref()
    }

    /// Handler or mount.
    #[must_use]
    pub const fn kind(&self) -> RouteKind {
        self.kind
    }

    /// Operation documentation contributed to the schema.
    #[must_use]
    pub fn docs(&self) -> &[EndpointDoc] {
        &self.docs
    }

    /// Names this binding reverses.
    #[must_use]
    pub fn requires(&self) -> &[RouteName] {
        &self.requires
    }

    /// Returns `true` if the entry contributes operations to the schema.
    #[must_use]
    pub fn is_documented(&self) -> bool {
        !self.docs.is_empty()
    }

    /// Whether the two entries would dispatch a common path.
    ///
    /// A mount claims its prefix, every path below it and the prefix without
    /// its trailing slash.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            || self.claims(&other.pattern)
            || other.claims(&self.pattern)
    }

    fn claims(&self, pattern: &str) -> bool {
        if self.kind != RouteKind::Mount {
            return false;
        }
        let bare = self.pattern.trim_end_matches('/');
        pattern.starts_with(&self.pattern) || (!bare.is_empty() && pattern == bare)
    }
}

/// Ordered, validated collection of [`RouteEntry`]s.
///
/// Names are unique, no two entries dispatch the same path, and every name an
/// entry requires is declared by some entry of the same index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteIndex {
    entries: Vec<RouteEntry>,
}

impl RouteIndex {
    /// Validate and index entries in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::DuplicateName`] if two entries share a name,
    /// [`RouteError::DuplicatePattern`] if an entry overlaps an earlier one and
    /// [`RouteError::UnresolvedName`] if an entry requires an undeclared name.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, RouteError> {
        let mut names: HashSet<&RouteName> = HashSet::new();
        for name in entries.iter().filter_map(RouteEntry::name) {
            if !names.insert(name) {
                return Err(RouteError::DuplicateName(name.clone()));
            }
        }

        for (i, entry) in entries.iter().enumerate() {
            if entries.iter().take(i).any(|earlier| earlier.overlaps(entry)) {
                return Err(RouteError::DuplicatePattern(entry.pattern.clone()));
            }
        }

        for entry in &entries {
            if let Some(missing) = entry.requires.iter().find(|n| !names.contains(n)) {
                return Err(RouteError::UnresolvedName {
                    name: missing.clone(),
                    required_by: entry.pattern.clone(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Resolve a route name to its path pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NoReverseMatch`] if no entry has that name.
    pub fn reverse(&self, name: &str) -> Result<&str, RouteError> {
        self.entries
            .iter()
            .find(|e| e.name.as_ref().is_some_and(|n| n.as_str() == name))
            .map(RouteEntry::pattern)
            .ok_or_else(|| RouteError::NoReverseMatch(name.to_owned()))
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Entries that contribute operations to the schema.
    pub fn documented(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter().filter(|e| e.is_documented())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
