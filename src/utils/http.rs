//! HTTP helpers for reading request headers.

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// Header value as an owned string, ignoring blank or non-UTF-8 values
pub fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Client address, preferring the first `X-Forwarded-For` hop
pub fn extract_client_ip(req: &HttpRequest) -> String {
    header_string(req.headers(), "X-Forwarded-For")
        .and_then(|forwarded| forwarded.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
        .or_else(|| req.connection_info().peer_addr().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}
