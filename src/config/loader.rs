use std::path::Path;

use config::{Config, File, FileFormat};
use eyre::{Context, Result};
use thiserror::Error;

use crate::{
    config::models::{RoutingConfig, ServerConfig},
    core::table::RoutingTable,
};

/// Failure modes for the routing table resource.
///
/// Never escapes [`load_routing_table`]; every variant resolves to the safe
/// default table.
#[derive(Debug, Error)]
pub enum RoutingTableError {
    #[error("routes file not found at {path}")]
    NotFound { path: String },

    #[error("failed to read routes file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse routes file {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
}

/// Load the country routing table from a JSON resource.
///
/// Never fails outward: a missing file, unreadable content, or a failed parse
/// resolves to the safe default table and the cause is logged at error level.
pub fn load_routing_table(path: &str) -> RoutingTable {
    match read_routing_config(path) {
        Ok(config) => {
            let table = RoutingTable::from_config(config);
            tracing::info!(
                "Loaded routing configuration with {} routes",
                table.routes().len()
            );
            table
        }
        Err(e) => {
            tracing::error!("Error loading routing configuration: {}", e);
            RoutingTable::safe_default()
        }
    }
}

fn read_routing_config(path: &str) -> Result<RoutingConfig, RoutingTableError> {
    let path_ref = Path::new(path);
    if !path_ref.exists() {
        return Err(RoutingTableError::NotFound {
            path: path.to_string(),
        });
    }

    let content = std::fs::read_to_string(path_ref).map_err(|source| {
        RoutingTableError::Unreadable {
            path: path.to_string(),
            source,
        }
    })?;

    serde_json::from_str(&content).map_err(|source| RoutingTableError::Malformed {
        path: path.to_string(),
        source,
    })
}

/// Load the gateway's own server configuration using the config crate.
/// Supports multiple formats: TOML, YAML, JSON, etc.
pub fn load_server_config(config_path: &str) -> Result<ServerConfig> {
    let path = Path::new(config_path);

    // Determine file format based on extension
    let format = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        Some("json") => FileFormat::Json,
        Some("toml") => FileFormat::Toml,
        Some("ini") => FileFormat::Ini,
        _ => FileFormat::Toml, // Default to TOML
    };

    let settings = Config::builder()
        .add_source(File::new(config_path, format))
        .build()
        .with_context(|| format!("Failed to build config from {}", path.display()))?;

    let server_config: ServerConfig = settings
        .try_deserialize()
        .with_context(|| format!("Failed to deserialize config from {}", path.display()))?;

    Ok(server_config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::core::table::FALLBACK_DEFAULT_ROUTE;

    #[test]
    fn test_load_routing_table_missing_file() {
        let table = load_routing_table("/definitely/not/here/routes.json");
        assert!(table.routes().is_empty());
        assert_eq!(table.default_route(), FALLBACK_DEFAULT_ROUTE);
    }

    #[test]
    fn test_load_routing_table_malformed_content() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{{ not json").unwrap();

        let table = load_routing_table(temp_file.path().to_str().unwrap());
        assert!(table.routes().is_empty());
        assert_eq!(table.default_route(), FALLBACK_DEFAULT_ROUTE);
    }

    #[test]
    fn test_load_routing_table_empty_content() {
        let temp_file = NamedTempFile::new().unwrap();

        let table = load_routing_table(temp_file.path().to_str().unwrap());
        assert!(table.routes().is_empty());
        assert_eq!(table.default_route(), FALLBACK_DEFAULT_ROUTE);
    }

    #[test]
    fn test_load_routing_table_normalizes_keys() {
        let json_content = r#"
        {
            "Routes": {
                "de": "https://de.example.com",
                "Br": "https://br.example.com"
            },
            "DefaultRoute": "https://us.example.com"
        }
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", json_content).unwrap();

        let table = load_routing_table(temp_file.path().to_str().unwrap());
        assert_eq!(table.routes().len(), 2);
        assert_eq!(table.routes()["DE"], "https://de.example.com");
        assert_eq!(table.routes()["BR"], "https://br.example.com");
        assert_eq!(table.default_route(), "https://us.example.com");
    }

    #[test]
    fn test_load_server_config_toml() {
        let toml_content = r#"
            listen_addr = "127.0.0.1:3000"
            routes_file = "custom-routes.json"

            [detection]
            fallback_country = "DE"
        "#;

        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = load_server_config(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:3000");
        assert_eq!(config.routes_file, "custom-routes.json");
        assert_eq!(config.detection.fallback_country, "DE");
        // Unset detection fields keep their defaults
        assert_eq!(config.detection.country_header, "X-Country-Code");
    }

    #[test]
    fn test_load_server_config_missing_file_fails() {
        let result = load_server_config("/definitely/not/here/gateway.toml");
        assert!(result.is_err());
    }
}
