//! Configuration data structures for Meridian.
//!
//! `ServerConfig` maps to the gateway's own settings file (TOML, also JSON /
//! YAML). `RoutingConfig` mirrors the external routing resource the gateway
//! consumes at startup; its field names follow that resource's JSON contract.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// Path to the country routing resource.
    pub routes_file: String,
    /// Country detection settings.
    pub detection: DetectionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            routes_file: "routes.json".to_string(),
            detection: DetectionConfig::default(),
        }
    }
}

/// Settings for the country detection precedence chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Header consulted first for an explicit country code.
    pub country_header: String,
    /// Query parameter consulted when the header is absent.
    pub country_param: String,
    /// Country code the static GeoIP adapter answers with.
    pub fallback_country: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            country_header: "X-Country-Code".to_string(),
            country_param: "country".to_string(),
            fallback_country: "US".to_string(),
        }
    }
}

/// Raw country routing resource: country code -> upstream URL, plus a default.
///
/// Field names follow the external JSON contract (`Routes` / `DefaultRoute`);
/// snake_case spellings are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoutingConfig {
    #[serde(default, alias = "routes")]
    pub routes: HashMap<String, String>,
    #[serde(default, alias = "default_route")]
    pub default_route: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_config_pascal_case_contract() {
        let json = r#"
        {
            "Routes": {
                "DE": "https://de.example.com",
                "BR": "https://br.example.com"
            },
            "DefaultRoute": "https://us.example.com"
        }
        "#;

        let config: RoutingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes["DE"], "https://de.example.com");
        assert_eq!(config.default_route, "https://us.example.com");
    }

    #[test]
    fn test_routing_config_snake_case_alias() {
        let json = r#"
        {
            "routes": { "FR": "https://fr.example.com" },
            "default_route": "https://us.example.com"
        }
        "#;

        let config: RoutingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.routes["FR"], "https://fr.example.com");
        assert_eq!(config.default_route, "https://us.example.com");
    }

    #[test]
    fn test_routing_config_missing_fields_default() {
        let config: RoutingConfig = serde_json::from_str("{}").unwrap();
        assert!(config.routes.is_empty());
        assert!(config.default_route.is_empty());
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.routes_file, "routes.json");
        assert_eq!(config.detection.country_header, "X-Country-Code");
        assert_eq!(config.detection.country_param, "country");
        assert_eq!(config.detection.fallback_country, "US");
    }
}
