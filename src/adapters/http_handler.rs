//! Diagnostic HTTP endpoints exposed alongside the proxy pipeline.
//!
//! These are thin: each one reads the shared routing state and serializes a
//! JSON view of it. The routing decisions themselves live in `core` and the
//! transform adapter.
use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    adapters::transform::RouteTransform,
    core::{context::RequestContext, table::RoutingTable},
};

/// Shared state for the diagnostic endpoints.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RoutingTable>,
    pub transform: Arc<RouteTransform>,
}

/// `GET /` - fixed status probe.
pub async fn status() -> impl IntoResponse {
    tracing::info!("Gateway status endpoint accessed");
    Json(json!({
        "message": "Gateway is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /status` - detailed status echoing the loaded routing table.
pub async fn detailed_status(State(state): State<AppState>) -> impl IntoResponse {
    let mut countries: Vec<&str> = state.table.routes().keys().map(String::as_str).collect();
    countries.sort_unstable();

    Json(json!({
        "status": "Running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "routing": {
            "availableCountries": countries,
            "defaultRoute": state.table.default_route(),
            "totalRoutes": state.table.routes().len(),
        },
    }))
}

/// `GET /routes` - raw route table dump.
pub async fn routes(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.table.routes().clone())
}

/// `GET /detect` - detect-and-resolve diagnostic for the calling request.
pub async fn detect(State(state): State<AppState>, req: Request) -> impl IntoResponse {
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let ctx = RequestContext::new(
        req.method().clone(),
        req.uri(),
        req.headers().clone(),
        remote_addr,
    );

    let decision = state.transform.decide(&ctx).await;

    Json(json!({
        "detectedCountry": decision.country_code,
        "targetUrl": decision.target_url,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fallback handler standing in for the proxy hand-off.
///
/// The real upstream selection happens in the proxy transport, which reads
/// the `ResolvedTarget` extension published by the route transform.
pub async fn proxy_placeholder() -> &'static str {
    "Request will be proxied based on country detection"
}
