//! Narrow per-request view handed to the routing components.
//!
//! Instead of passing a full framework request object around, the detector
//! and transform receive a `RequestContext`: read accessors for the request
//! surface they are allowed to inspect (method, path, headers, query,
//! remote address) plus exactly one write slot, the published upstream
//! target. The slot is owned by the request's task and is never visible to
//! another request.
use std::{collections::HashMap, net::SocketAddr};

use http::{HeaderMap, Method, Uri};

use crate::utils::client_ip::client_ip;

/// Read-only request view with a single write slot for the resolved target.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    headers: HeaderMap,
    query: HashMap<String, String>,
    remote_addr: Option<SocketAddr>,
    target: Option<String>,
}

impl RequestContext {
    pub fn new(
        method: Method,
        uri: &Uri,
        headers: HeaderMap,
        remote_addr: Option<SocketAddr>,
    ) -> Self {
        let query = uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            method,
            path: uri.path().to_string(),
            headers,
            query,
            remote_addr,
            target: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// First value of the named header, if it is valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Value of the named query parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// Client IP via the shared forwarded-header precedence.
    pub fn client_ip(&self) -> String {
        client_ip(&self.headers, self.remote_addr)
    }

    /// Publish the resolved upstream target for the proxy transport.
    pub fn publish_target(&mut self, target: impl Into<String>) {
        self.target = Some(target.into());
    }

    /// The published target, if the transform produced a valid one.
    pub fn published_target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}
