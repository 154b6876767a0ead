//! OpenAPI schema export.
//!
//! Generates the same document the documentation views serve, without
//! starting the server.
//!
//! # Environment Variables
//!
//! - `APP_BASE_URL` - Advertised as the document's server when set

use std::fs;
use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use minha_api_server::config::ServerConfig;
use minha_api_server::docs::{RouteIntrospector, SchemaIntrospector, SchemaScope};
use minha_api_server::schema::minha_api;

use super::{CommandError, route_index};

/// Serialization format of the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

/// Render the OpenAPI document for the served route table.
pub fn render(config: &ServerConfig, format: SchemaFormat) -> Result<String, CommandError> {
    let index = route_index(config)?;
    let scope = SchemaScope {
        authenticated: false,
        server_url: config.base_url.as_ref(),
    };
    let openapi = RouteIntrospector.generate(&minha_api(), &index, &scope);

    let body = match format {
        SchemaFormat::Json => openapi.to_pretty_json()?,
        SchemaFormat::Yaml => serde_yaml::to_string(&openapi)?,
    };
    Ok(body)
}

/// Write the document to `output`, or stdout when `None`.
pub fn export(
    config: &ServerConfig,
    format: SchemaFormat,
    output: Option<&Path>,
) -> Result<(), CommandError> {
    let body = render(config, format)?;

    match output {
        Some(path) => {
            fs::write(path, &body)?;
            tracing::info!(path = %path.display(), "Schema written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(body.as_bytes())?;
            if !body.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    #[test]
    fn test_render_json_documents_health() {
        let body = render(&ServerConfig::default(), SchemaFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(json["info"]["title"], "Minha API");
        assert_eq!(json["info"]["version"], "v1");
        assert!(json["paths"]["/health"]["get"].is_object());
        assert!(json["paths"].get("/swagger/").is_none());
    }

    #[test]
    fn test_render_yaml() {
        let body = render(&ServerConfig::default(), SchemaFormat::Yaml).unwrap();
        assert!(body.contains("title: Minha API"));
        assert!(body.contains("/health"));
    }

    #[test]
    fn test_render_advertises_base_url() {
        let config = ServerConfig {
            base_url: Some(Url::parse("https://api.example.com/").unwrap()),
            ..ServerConfig::default()
        };
        let body = render(&config, SchemaFormat::Json).unwrap();
        assert!(body.contains("https://api.example.com/"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.yaml");

        export(&ServerConfig::default(), SchemaFormat::Yaml, Some(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Minha API"));
    }
}
