//! Immutable country routing table.
//!
//! Built exactly once at startup from a [`RoutingConfig`] and shared via
//! `Arc` across all request tasks. No writer exists after construction, so
//! lookups need no locking.
use std::collections::HashMap;

use url::Url;

use crate::config::models::RoutingConfig;

/// Default route used when the configured one is missing or invalid.
pub const FALLBACK_DEFAULT_ROUTE: &str = "https://us.example.com";

/// Mapping from normalized country codes to upstream URLs.
///
/// Keys are uppercased at construction; the default route is always a valid
/// absolute URL. Route values are kept verbatim and validated later, at the
/// point where a resolved target is about to be published.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    routes: HashMap<String, String>,
    default_route: String,
}

impl RoutingTable {
    /// Build a table from the raw routing resource.
    ///
    /// Country codes are trimmed and uppercased; codes shorter than two
    /// characters are dropped. A default route that does not parse as an
    /// absolute URL is replaced with [`FALLBACK_DEFAULT_ROUTE`], keeping any
    /// valid routes.
    pub fn from_config(config: RoutingConfig) -> Self {
        let mut routes = HashMap::with_capacity(config.routes.len());
        for (code, target) in config.routes {
            let normalized = code.trim().to_uppercase();
            if normalized.len() < 2 {
                tracing::warn!("Dropping route with invalid country code '{}'", code);
                continue;
            }
            if let Some(previous) = routes.insert(normalized.clone(), target) {
                tracing::warn!(
                    "Duplicate route for country {} replaced (was {})",
                    normalized,
                    previous
                );
            }
        }

        let trimmed = config.default_route.trim();
        let default_route = match Url::parse(trimmed) {
            Ok(_) => trimmed.to_string(),
            Err(e) => {
                tracing::error!(
                    "Configured default route '{}' is not an absolute URL ({}), using {}",
                    config.default_route,
                    e,
                    FALLBACK_DEFAULT_ROUTE
                );
                FALLBACK_DEFAULT_ROUTE.to_string()
            }
        };

        Self {
            routes,
            default_route,
        }
    }

    /// The built-in table used when the routing resource cannot be loaded:
    /// no country routes, fallback default.
    pub fn safe_default() -> Self {
        Self {
            routes: HashMap::new(),
            default_route: FALLBACK_DEFAULT_ROUTE.to_string(),
        }
    }

    /// All configured routes, keyed by normalized country code.
    pub fn routes(&self) -> &HashMap<String, String> {
        &self.routes
    }

    /// The route used when no country-specific route matches.
    pub fn default_route(&self) -> &str {
        &self.default_route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(routes: &[(&str, &str)], default_route: &str) -> RoutingConfig {
        RoutingConfig {
            routes: routes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            default_route: default_route.to_string(),
        }
    }

    #[test]
    fn test_keys_are_uppercased() {
        let table = RoutingTable::from_config(config(
            &[("de", "https://de.example.com"), ("bR", "https://br.example.com")],
            "https://us.example.com",
        ));

        assert_eq!(table.routes().len(), 2);
        assert!(table.routes().contains_key("DE"));
        assert!(table.routes().contains_key("BR"));
        assert!(!table.routes().contains_key("de"));
    }

    #[test]
    fn test_short_keys_are_dropped() {
        let table = RoutingTable::from_config(config(
            &[("D", "https://d.example.com"), ("", "https://empty.example.com"), ("DE", "https://de.example.com")],
            "https://us.example.com",
        ));

        assert_eq!(table.routes().len(), 1);
        assert!(table.routes().contains_key("DE"));
    }

    #[test]
    fn test_invalid_default_route_falls_back() {
        let table = RoutingTable::from_config(config(
            &[("DE", "https://de.example.com")],
            "not-a-url",
        ));

        assert_eq!(table.default_route(), FALLBACK_DEFAULT_ROUTE);
        // Valid routes survive the default-route substitution
        assert_eq!(table.routes()["DE"], "https://de.example.com");
    }

    #[test]
    fn test_empty_default_route_falls_back() {
        let table = RoutingTable::from_config(config(&[], ""));
        assert_eq!(table.default_route(), FALLBACK_DEFAULT_ROUTE);
    }

    #[test]
    fn test_valid_default_route_is_kept_verbatim() {
        let table = RoutingTable::from_config(config(&[], "https://eu.example.com/origin"));
        assert_eq!(table.default_route(), "https://eu.example.com/origin");
    }

    #[test]
    fn test_safe_default() {
        let table = RoutingTable::safe_default();
        assert!(table.routes().is_empty());
        assert_eq!(table.default_route(), "https://us.example.com");
    }
}
