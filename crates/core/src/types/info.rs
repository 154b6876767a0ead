//! API metadata shown by the documentation views.

use serde::{Deserialize, Serialize};

/// Title, version and description of the documented API.
///
/// ## Examples
///
/// ```
/// use minha_api_core::ApiInfo;
///
/// let info = ApiInfo::new("Minha API", "v1", "Documentação interativa da API");
/// assert_eq!(info.title(), "Minha API");
/// assert_eq!(info.version(), "v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    title: String,
    version: String,
    description: String,
}

impl ApiInfo {
    /// Create API metadata from its three display strings.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: description.into(),
        }
    }

    /// Returns the API title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the API version string (e.g., `v1`).
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_info_accessors() {
        let info = ApiInfo::new("Minha API", "v1", "Documentação interativa da API");
        assert_eq!(info.title(), "Minha API");
        assert_eq!(info.version(), "v1");
        assert_eq!(info.description(), "Documentação interativa da API");
    }

    #[test]
    fn test_api_info_serializes_fields() {
        let info = ApiInfo::new("Minha API", "v1", "desc");
        let json = serde_json::to_value(&info).expect("serialize");
        assert_eq!(json["title"], "Minha API");
        assert_eq!(json["version"], "v1");
        assert_eq!(json["description"], "desc");
    }
}
