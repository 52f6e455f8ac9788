//! HTTP utility functions for extracting request information.

use crate::{config::TrustedProxies, middleware::RequestId};
use actix_web::{HttpMessage, HttpRequest, web};

/// Proxy headers consulted for the client address, in order of preference
const CLIENT_IP_HEADERS: [&str; 4] = [
    "X-Forwarded-For",
    "X-Real-IP",
    "CF-Connecting-IP",
    "Forwarded-For",
];

fn forwarded_client_ip(req: &HttpRequest) -> Option<String> {
    CLIENT_IP_HEADERS
        .iter()
        .filter_map(|name| req.headers().get(*name))
        .filter_map(|value| value.to_str().ok())
        // X-Forwarded-For can list several hops; the first is the client.
        .filter_map(|value| value.split(',').next().map(str::trim))
        .find(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// Extract the client IP address
///
/// Proxy headers are only honoured when the socket peer is one of the
/// registered [`TrustedProxies`]; otherwise the peer address is used as is.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    let peer = req.peer_addr().map(|addr| addr.ip());

    let from_trusted_proxy = match (peer, req.app_data::<web::Data<TrustedProxies>>()) {
        (Some(peer), Some(proxies)) => proxies.contains(&peer),
        _ => false,
    };

    from_trusted_proxy
        .then(|| forwarded_client_ip(req))
        .flatten()
        .or_else(|| peer.map(|ip| ip.to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Request ID assigned by the tracing middleware, if it ran
pub fn extract_request_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<RequestId>().map(|id| id.0.clone())
}

/// Request details attached to every audit event
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub endpoint: String,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn from_request(req: &HttpRequest) -> Self {
        Self {
            ip_address: extract_client_ip(req),
            user_agent: extract_user_agent(req),
            endpoint: req.path().to_string(),
            request_id: extract_request_id(req),
        }
    }
}
