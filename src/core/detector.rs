//! Country detection for inbound requests.
use std::sync::Arc;

use crate::{
    config::models::DetectionConfig, core::context::RequestContext, ports::geoip::GeoIpResolver,
};

/// Detects a request's country code via an ordered precedence chain:
/// explicit header, query parameter, GeoIP lookup on the client IP.
///
/// Detection is total: it always produces a value, with the GeoIP port as
/// the final fallback. Values from the header and query parameter are
/// returned as-is; normalization happens at route lookup time.
pub struct CountryDetector {
    country_header: String,
    country_param: String,
    geoip: Arc<dyn GeoIpResolver>,
}

impl CountryDetector {
    pub fn new(detection: &DetectionConfig, geoip: Arc<dyn GeoIpResolver>) -> Self {
        Self {
            country_header: detection.country_header.clone(),
            country_param: detection.country_param.clone(),
            geoip,
        }
    }

    /// Detect the country code for a request. The source that satisfied
    /// detection is logged at info level.
    pub async fn detect(&self, ctx: &RequestContext) -> String {
        if let Some(code) = ctx.header(&self.country_header).filter(|v| !v.is_empty()) {
            tracing::info!("Country code detected from header: {}", code);
            return code.to_string();
        }

        if let Some(code) = ctx.query(&self.country_param).filter(|v| !v.is_empty()) {
            tracing::info!("Country code detected from query parameter: {}", code);
            return code.to_string();
        }

        let client_ip = ctx.client_ip();
        tracing::info!(
            "No country code found in headers/query, client IP: {}",
            client_ip
        );
        self.geoip.resolve_country(&client_ip).await
    }
}
