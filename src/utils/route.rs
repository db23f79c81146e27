//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Matched route pattern for metric labels
///
/// Unmatched paths collapse into `/unknown` so arbitrary URLs cannot grow
/// label cardinality.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unknown".to_string())
}
