pub mod geoip;
pub mod http_handler;
pub mod middleware;
pub mod transform;

/// Re-export commonly used types from adapters
pub use geoip::StaticGeoIp;
pub use http_handler::AppState;
pub use middleware::*;
pub use transform::{ResolvedTarget, RouteTransform, route_transform_middleware};
