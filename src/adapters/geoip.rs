use async_trait::async_trait;

use crate::ports::geoip::GeoIpResolver;

/// GeoIP adapter that answers a fixed country code for every lookup.
///
/// Stands in until a real GeoIP database or lookup service is wired in
/// behind the [`GeoIpResolver`] port. The code it returns comes from the
/// detection configuration.
pub struct StaticGeoIp {
    country: String,
}

impl StaticGeoIp {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
        }
    }
}

#[async_trait]
impl GeoIpResolver for StaticGeoIp {
    async fn resolve_country(&self, client_ip: &str) -> String {
        tracing::debug!("Static GeoIP lookup for {}: {}", client_ip, self.country);
        self.country.clone()
    }
}
