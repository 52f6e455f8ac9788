//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Matched route pattern for metrics labels.
///
/// Uses the router's pattern once the request has been routed so that
/// dynamic segments do not explode label cardinality; unmatched requests
/// are grouped under `/unknown`.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unknown".to_string())
}
