//! Shared request/decode step for upstream JSON APIs.

use crate::error::{ToolError, Upstream};
use crate::services::resilient_client::ResilientClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// Build an upstream URL with a percent-encoded query string
pub(crate) fn build_url(
    base: &str,
    params: &[(&str, String)],
    upstream: Upstream,
) -> Result<Url, ToolError> {
    Url::parse_with_params(base, params).map_err(|e| {
        ToolError::configuration(format!("invalid {} URL '{base}': {e}", upstream.api_name()))
    })
}

/// GET `url` and decode a successful JSON body into `T`
///
/// Non-2xx answers become [`ToolError::UpstreamStatus`] carrying the body.
/// Bodies are read under the client's request timeout.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    client: &ResilientClient,
    url: &Url,
    upstream: Upstream,
) -> Result<T, ToolError> {
    debug!(upstream = upstream.label(), path = url.path(), "Fetching upstream data");

    let response = client
        .get(url.as_str())
        .await
        .map_err(|e| ToolError::from_transport(upstream, e))?;

    let status = response.status();
    let body = client
        .read_text(response)
        .await
        .map_err(|e| ToolError::from_transport(upstream, e))?;

    if !status.is_success() {
        warn!(
            upstream = upstream.label(),
            status = status.as_u16(),
            "Upstream returned an error status"
        );
        return Err(ToolError::UpstreamStatus {
            upstream,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| ToolError::malformed(upstream, e.to_string()))
}
