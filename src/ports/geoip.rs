use async_trait::async_trait;

/// Trait for resolving a client IP address to a country code.
///
/// This is the designated extension point for real IP geolocation (a GeoIP
/// database, an external lookup service). The gateway ships with a static
/// adapter that answers a fixed configured code; callers must treat the
/// output as opaque.
#[async_trait]
pub trait GeoIpResolver: Send + Sync {
    /// Resolve the country code for the given client IP.
    async fn resolve_country(&self, client_ip: &str) -> String;
}
