// Integration tests for country detection precedence and client IP extraction
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use http::{HeaderMap, HeaderValue, Method};
    use meridian::{
        GeoIpResolver,
        adapters::StaticGeoIp,
        config::models::DetectionConfig,
        core::{CountryDetector, RequestContext},
        utils::client_ip,
    };

    fn context(uri: &str, headers: &[(&str, &str)]) -> RequestContext {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            header_map.insert(
                http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        RequestContext::new(Method::GET, &uri.parse().unwrap(), header_map, None)
    }

    fn detector() -> CountryDetector {
        CountryDetector::new(
            &DetectionConfig::default(),
            Arc::new(StaticGeoIp::new("US")),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_header_wins_over_query_parameter() {
        let ctx = context("/?country=br", &[("X-Country-Code", "DE")]);
        assert_eq!(detector().detect(&ctx).await, "DE");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_query_parameter_wins_over_geoip() {
        let ctx = context("/?country=br", &[("X-Forwarded-For", "1.2.3.4")]);
        assert_eq!(detector().detect(&ctx).await, "br");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_geoip_output_is_opaque_and_overridable() {
        // A different resolver behind the port changes the fallback result
        struct ByNetwork;

        #[async_trait]
        impl GeoIpResolver for ByNetwork {
            async fn resolve_country(&self, client_ip: &str) -> String {
                if client_ip.starts_with("10.") {
                    "DE".to_string()
                } else {
                    "US".to_string()
                }
            }
        }

        let detector =
            CountryDetector::new(&DetectionConfig::default(), Arc::new(ByNetwork));

        let ctx = context("/", &[("X-Forwarded-For", "10.1.2.3")]);
        assert_eq!(detector.detect(&ctx).await, "DE");

        let ctx = context("/", &[("X-Forwarded-For", "8.8.8.8")]);
        assert_eq!(detector.detect(&ctx).await, "US");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_configurable_detection_sources() {
        let detection = DetectionConfig {
            country_header: "X-Geo".to_string(),
            country_param: "region".to_string(),
            fallback_country: "AU".to_string(),
        };
        let detector = CountryDetector::new(
            &detection,
            Arc::new(StaticGeoIp::new(detection.fallback_country.clone())),
        );

        let ctx = context("/?region=br", &[("X-Geo", "DE")]);
        assert_eq!(detector.detect(&ctx).await, "DE");

        let ctx = context("/?region=br", &[]);
        assert_eq!(detector.detect(&ctx).await, "br");

        let ctx = context("/", &[]);
        assert_eq!(detector.detect(&ctx).await, "AU");
    }

    #[test]
    fn test_forwarded_for_yields_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Forwarded-For",
            HeaderValue::from_static("1.2.3.4, 5.6.6.6"),
        );

        assert_eq!(client_ip(&headers, None), "1.2.3.4");
    }

    #[test]
    fn test_detector_and_context_share_ip_extraction() {
        let ctx = context("/", &[("X-Forwarded-For", "1.2.3.4, 5.6.6.6")]);
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Forwarded-For",
            HeaderValue::from_static("1.2.3.4, 5.6.6.6"),
        );

        assert_eq!(ctx.client_ip(), client_ip(&headers, None));
    }
}
