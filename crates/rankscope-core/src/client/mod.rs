//! HTTP implementations of the service traits.
//!
//! This module wraps reqwest, which works on both native and WASM platforms:
//! - Native: hyper with rustls-tls for HTTPS
//! - WASM: the browser fetch() API
//!
//! All clients share one pooled `reqwest::Client` so repeated catalog lookups
//! against the same host reuse connections.

mod backend;
mod catalog;

pub use backend::{decode_offline_metrics, decode_query_response, HttpRecommenderClient};
pub use catalog::{decode_catalog_response, HttpCatalogClient};

use once_cell::sync::Lazy;
use std::time::Duration;

use crate::error::ApiError;

/// Global HTTP client for connection pooling.
///
/// Native builds get a user agent and up to 10 idle connections per host.
/// The browser manages both itself. Timeouts are set per request.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(build_client);

#[cfg(not(target_arch = "wasm32"))]
fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(crate::config::USER_AGENT)
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}

#[cfg(target_arch = "wasm32")]
fn build_client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Returns the shared pooled client.
pub(crate) fn shared_client() -> reqwest::Client {
    HTTP_CLIENT.clone()
}

/// Parses a configured base URL, rejecting anything that is not http(s).
pub(crate) fn parse_base_url(base: &str) -> Result<url::Url, ApiError> {
    let parsed =
        url::Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ApiError::InvalidUrl(format!(
            "Unsupported scheme: {} (only http/https allowed)",
            parsed.scheme()
        )));
    }
    if parsed.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(format!("{} cannot be a base URL", base)));
    }

    Ok(parsed)
}

/// Appends path segments to a base URL, keeping any path prefix the base already has.
pub(crate) fn join_segments(base: &url::Url, segments: &[&str]) -> Result<url::Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Splits an endpoint path such as `/api/metrics` into URL segments.
pub(crate) fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Builds a GET with the client's timeout. Browsers ignore timeouts.
pub(crate) fn get_request(
    client: &reqwest::Client,
    url: url::Url,
    timeout: Duration,
) -> reqwest::RequestBuilder {
    let request = client.get(url);
    #[cfg(not(target_arch = "wasm32"))]
    let request = request.timeout(timeout);
    #[cfg(target_arch = "wasm32")]
    let _ = timeout;
    request
}

/// Maps a non-success status to [`ApiError::Status`].
pub(crate) fn ensure_success(status: reqwest::StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status(status.as_u16()))
    }
}

/// Sends a GET and returns the status code and body text.
///
/// Anything that prevents a response from arriving is a transport error.
pub(crate) async fn get_text(
    request: reqwest::RequestBuilder,
) -> Result<(reqwest::StatusCode, String), ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e)))?;
    Ok((status, body))
}
