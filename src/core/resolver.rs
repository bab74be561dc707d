//! Route resolution: detected country code -> upstream target URL.
use crate::core::table::RoutingTable;

/// Outcome of routing resolution for a single request.
///
/// Derived deterministically from the request and the routing table; lives
/// only for the request and is published to the proxy transport via the
/// request context's write slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    /// Country code as detected (not normalized).
    pub country_code: String,
    /// Resolved upstream target URL.
    pub target_url: String,
}

/// Resolve the upstream target URL for a detected country code.
///
/// An empty code or a code with no configured route resolves to the table's
/// default route; neither is an error. Pure given its inputs aside from
/// logging.
pub fn resolve_target(country_code: &str, table: &RoutingTable) -> String {
    if country_code.trim().is_empty() {
        tracing::warn!("Country code is empty, using default route");
        return table.default_route().to_string();
    }

    let normalized = country_code.trim().to_uppercase();

    match table.routes().get(&normalized) {
        Some(target) => {
            tracing::info!(
                "Routing request for country {} to {}",
                normalized,
                target
            );
            target.clone()
        }
        None => {
            tracing::warn!(
                "No route found for country {}, using default route",
                normalized
            );
            table.default_route().to_string()
        }
    }
}
