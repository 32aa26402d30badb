//! HTTP plumbing shared by the geocoding providers

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{AtlasError, ErrorCode};
use crate::Result;

/// Build the HTTP client used by a provider
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| AtlasError::config(format!("Failed to create HTTP client: {e}")))
}

/// Issue a GET and decode the JSON body, mapping failures to API error codes.
///
/// `redacted_url` is what gets logged; it must not contain credentials.
/// Transport errors are stripped of the request URL for the same reason.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    redacted_url: &str,
) -> Result<T> {
    let start = Instant::now();
    debug!("GET {}", redacted_url);

    let response = client.get(url).send().await.map_err(|e| {
        AtlasError::api_with_context(
            format!("Network error: {}", e.without_url()),
            ErrorCode::ApiNetworkError,
            HashMap::from([("url".to_string(), redacted_url.to_string())]),
        )
    })?;

    let response = check_status(response, redacted_url)?;

    let body = response.json::<T>().await.map_err(|e| {
        AtlasError::api_with_context(
            format!("Failed to parse geocoding response: {}", e.without_url()),
            ErrorCode::ApiInvalidResponse,
            HashMap::from([("url".to_string(), redacted_url.to_string())]),
        )
    })?;

    let elapsed = start.elapsed();
    if elapsed.as_secs() > 5 {
        warn!("Slow geocoding response: {:.3}s", elapsed.as_secs_f64());
    } else {
        debug!("Geocoding response in {:.3}s", elapsed.as_secs_f64());
    }

    Ok(body)
}

fn check_status(response: Response, redacted_url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = match status.as_u16() {
        401 | 403 => ErrorCode::ApiUnauthorized,
        404 => ErrorCode::ApiLocationNotFound,
        429 => ErrorCode::ApiRateLimit,
        _ => ErrorCode::ApiNetworkError,
    };

    Err(AtlasError::api_with_context(
        format!(
            "Geocoding request failed with status: {} - {}",
            status,
            status.canonical_reason().unwrap_or("Unknown error")
        ),
        code,
        HashMap::from([
            ("status_code".to_string(), status.as_u16().to_string()),
            ("url".to_string(), redacted_url.to_string()),
        ]),
    ))
}
