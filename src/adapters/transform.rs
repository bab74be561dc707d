//! Country-based request transform invoked ahead of the proxy transport.
use std::{net::SocketAddr, panic::AssertUnwindSafe, sync::Arc};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use futures_util::FutureExt;
use url::Url;

use crate::core::{
    context::RequestContext,
    detector::CountryDetector,
    resolver::{RouteDecision, resolve_target},
    table::RoutingTable,
};

/// Request extension carrying the resolved upstream target URL.
///
/// The downstream proxy transport reads this value when choosing an
/// upstream. Absence means "use the transport's own default behavior";
/// the transform never forces a broken target on the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget(pub String);

/// Detects a request's country, resolves the matching upstream, and
/// publishes the result into per-request state for the proxy transport.
pub struct RouteTransform {
    detector: CountryDetector,
    table: Arc<RoutingTable>,
}

impl RouteTransform {
    pub fn new(detector: CountryDetector, table: Arc<RoutingTable>) -> Self {
        Self { detector, table }
    }

    /// Detect the request's country and resolve the upstream target for it.
    pub async fn decide(&self, ctx: &RequestContext) -> RouteDecision {
        let country_code = self.detector.detect(ctx).await;
        let target_url = resolve_target(&country_code, &self.table);
        RouteDecision {
            country_code,
            target_url,
        }
    }

    /// Resolve a target for the request and publish it into the context
    /// write slot. A target that is not an absolute URL is not published;
    /// the proxy transport then falls through to its default behavior.
    pub async fn apply(&self, ctx: &mut RequestContext) {
        let decision = self.decide(ctx).await;

        match Url::parse(&decision.target_url) {
            Ok(_) => {
                tracing::info!(
                    "Transformed request for country {} to {}",
                    decision.country_code,
                    decision.target_url
                );
                ctx.publish_target(decision.target_url);
            }
            Err(e) => {
                tracing::error!("Invalid target URL {}: {}", decision.target_url, e);
            }
        }
    }
}

/// Axum middleware running [`RouteTransform::apply`] for every request that
/// reaches the proxy pipeline.
///
/// A failure inside detection or resolution never aborts the request: the
/// panic is caught here, logged, and the request proceeds with no target
/// published.
pub async fn route_transform_middleware(
    State(transform): State<Arc<RouteTransform>>,
    mut req: Request,
    next: Next,
) -> Response {
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let mut ctx = RequestContext::new(
        req.method().clone(),
        req.uri(),
        req.headers().clone(),
        remote_addr,
    );

    if AssertUnwindSafe(transform.apply(&mut ctx))
        .catch_unwind()
        .await
        .is_err()
    {
        tracing::error!(
            "Route transform failed for {} {}, no target published",
            ctx.method(),
            ctx.path()
        );
    }

    if let Some(target) = ctx.published_target() {
        req.extensions_mut().insert(ResolvedTarget(target.to_string()));
    }

    next.run(req).await
}
