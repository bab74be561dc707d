//! Meridian - a country-aware request gateway.
//!
//! Meridian decides, per inbound HTTP request, which upstream origin should
//! serve it based on the client's apparent country, and publishes that
//! decision into per-request state for a downstream proxy transport to
//! consume. The gateway only *decides* the target; it does not implement
//! the proxying itself.
//!
//! # Features
//! - Ordered country detection: explicit header, query parameter, GeoIP
//!   fallback (pluggable via the [`ports::geoip::GeoIpResolver`] port)
//! - Immutable country routing table loaded once at startup, with a
//!   built-in safe default when the resource is missing or malformed
//! - Case-insensitive route lookup with default-route fallback
//! - Request observability middleware: entry/exit logging, response
//!   buffering, duration measurement, uniform JSON error translation
//! - Diagnostic endpoints (`/`, `/status`, `/routes`, `/detect`)
//! - Structured tracing via `tracing` (JSON or console output)
//!
//! # Quick Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use meridian::{
//!     adapters::StaticGeoIp,
//!     config::{self, models::DetectionConfig},
//!     core::CountryDetector,
//!     RouteTransform,
//! };
//!
//! // Load the routing table (never fails; falls back to a safe default)
//! let table = Arc::new(config::load_routing_table("routes.json"));
//! let detection = DetectionConfig::default();
//! let detector = CountryDetector::new(&detection, Arc::new(StaticGeoIp::new("US")));
//! let transform = RouteTransform::new(detector, table);
//! // Wire `transform` into the route transform middleware (see the binary crate)
//! ```
//!
//! # Architecture
//! The crate separates **ports** (traits) from **adapters**
//! (implementations) while keeping business logic inside `core`. The
//! routing table is constructed once and shared read-only across request
//! tasks; each request owns its own context and response buffer.
//!
//! # Error Handling
//! Fallible startup APIs return `eyre::Result<T>`; the routing table load
//! recovers locally and never fails outward. Nothing that goes wrong during
//! a request reaches the client in raw form - only a fixed JSON error shape.
// Re-export public modules with explicit visibility controls
pub mod config;
pub mod ports;
pub mod tracing_setup;
pub mod utils;

// These modules are implementation details and should not be directly used by users
pub mod adapters;
pub mod core;

// Re-export the specific types needed by the binary crate
pub use crate::{
    adapters::{AppState, ResolvedTarget, RouteTransform, StaticGeoIp},
    core::{CountryDetector, RequestContext, RouteDecision, RoutingTable},
    ports::geoip::GeoIpResolver,
};
