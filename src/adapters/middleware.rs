//! Axum middleware wrapping the request lifecycle.
//!
//! `observability_middleware` is the outermost layer: it logs entry and
//! exit for every request, buffers the response body in memory so the
//! response can be measured before it reaches the transport, and converts
//! any unhandled failure into a uniform JSON 500. The remaining functions
//! are lightweight composable layers (CORS, request ID) attached to the
//! same `Router`.
use std::{net::SocketAddr, panic::AssertUnwindSafe, time::Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures_util::FutureExt;
use http_body_util::BodyExt;
use tracing::Instrument;

use crate::utils::client_ip::client_ip;

/// Log entry/exit, buffer the response, and translate unhandled failures.
///
/// The inner stack's response body is collected into an in-memory buffer
/// before anything is handed to the transport. On the failure path the
/// buffered content is dropped and replaced with the error body; nothing has
/// reached the client at that point. Both exit paths rebuild a complete
/// response, so the transport always receives exactly one.
pub async fn observability_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let ip = client_ip(req.headers(), remote_addr);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    tracing::info!(
        "Incoming request: {} {} from {} with User-Agent: {}",
        method,
        path,
        ip,
        user_agent
    );

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => {
            let status = response.status();
            let (parts, body) = response.into_parts();
            match body.collect().await {
                Ok(collected) => {
                    let buffered: Bytes = collected.to_bytes();
                    let duration = start.elapsed();
                    tracing::info!(
                        "Request completed: {} {} - Status: {} - Duration: {}ms",
                        method,
                        path,
                        status.as_u16(),
                        duration.as_millis()
                    );
                    Response::from_parts(parts, Body::from(buffered))
                }
                Err(e) => {
                    tracing::error!(
                        "Response body error during request: {} {}: {}",
                        method,
                        path,
                        e
                    );
                    internal_error_response(&path)
                }
            }
        }
        Err(panic) => {
            tracing::error!(
                "Unhandled panic during request: {} {}: {}",
                method,
                path,
                panic_message(panic.as_ref())
            );
            internal_error_response(&path)
        }
    }
}

/// Fixed-shape error body returned for any unhandled failure. Diagnostic
/// detail goes to the tracing sink only.
fn internal_error_response(path: &str) -> Response {
    let body = serde_json::json!({
        "error": "An internal server error occurred",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "path": path,
    });

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Generate a per-request UUID, attach it to the tracing span, and expose it
/// via `X-Request-ID`.
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("request", request_id = %request_id);

    let mut response = next.run(req).instrument(span).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("X-Request-ID", header_value);
    }

    response
}

/// Permissive CORS headers matching the gateway's open-origin policy.
pub async fn cors_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type, Authorization, X-Country-Code"),
    );

    response
}
