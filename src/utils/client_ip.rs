//! Client IP extraction shared by the detector and the request middleware.
use std::net::SocketAddr;

use http::HeaderMap;

/// Placeholder returned when no client address can be determined.
pub const UNKNOWN_CLIENT: &str = "Unknown";

/// Extract the client IP for a request.
///
/// Precedence: first entry of `X-Forwarded-For` (comma separated, trimmed),
/// then `X-Real-IP`, then the transport-level remote address. Returns
/// [`UNKNOWN_CLIENT`] when none are available. Every component that needs a
/// client IP goes through this function so the same request always yields
/// the same value.
pub fn client_ip(headers: &HeaderMap, remote_addr: Option<SocketAddr>) -> String {
    #[allow(clippy::collapsible_if)]
    if let Some(forwarded_for) = headers.get("X-Forwarded-For").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded_for.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    #[allow(clippy::collapsible_if)]
    if let Some(real_ip) = headers.get("X-Real-IP").and_then(|v| v.to_str().ok()) {
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    remote_addr.map_or_else(|| UNKNOWN_CLIENT.to_string(), |addr| addr.ip().to_string())
}
