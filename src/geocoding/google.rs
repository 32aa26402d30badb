//! Google Maps Geocoding API (commercial, requires an API key)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::instrument;

use super::GeocodingProvider;
use super::http::{build_client, get_json};
use crate::error::{AtlasError, ErrorCode};
use crate::Result;
use crate::models::Coordinates;

pub const DEFAULT_GOOGLE_URL: &str = "https://maps.googleapis.com/maps/api";

#[derive(Debug, Deserialize)]
pub struct GoogleResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GoogleResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleResult {
    pub formatted_address: Option<String>,
    pub geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
pub struct GoogleGeometry {
    pub location: GoogleLatLng,
}

#[derive(Debug, Deserialize)]
pub struct GoogleLatLng {
    pub lat: f64,
    pub lng: f64,
}

pub struct GoogleGeocodingProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocodingProvider {
    pub fn new(base_url: &str, api_key: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AtlasError::config(
                "The google geocoding provider requires an API key",
            ));
        }

        Ok(Self {
            client: build_client(user_agent, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn geocode_url(&self, query: &str, key: &str) -> String {
        format!(
            "{}/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            key
        )
    }

    /// Interpret the API status and pick the first result
    pub fn parse_response(response: &GoogleResponse) -> Result<Option<Coordinates>> {
        let code = match response.status.as_str() {
            "OK" => {
                return Ok(response.results.iter().find_map(|result| {
                    Coordinates::new(result.geometry.location.lat, result.geometry.location.lng)
                }));
            }
            "ZERO_RESULTS" => return Ok(None),
            "REQUEST_DENIED" => ErrorCode::ApiUnauthorized,
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => ErrorCode::ApiRateLimit,
            "INVALID_REQUEST" => ErrorCode::ApiInvalidResponse,
            _ => ErrorCode::ApiNetworkError,
        };

        Err(AtlasError::api_with_context(
            response
                .error_message
                .clone()
                .unwrap_or_else(|| format!("Geocoding failed with status {}", response.status)),
            code,
            HashMap::from([("status".to_string(), response.status.clone())]),
        ))
    }
}

#[async_trait]
impl GeocodingProvider for GoogleGeocodingProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    #[instrument(skip(self), fields(provider = "google"))]
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>> {
        let url = self.geocode_url(query, &self.api_key);
        let redacted = self.geocode_url(query, "<redacted>");

        let response: GoogleResponse = get_json(&self.client, &url, &redacted).await?;
        Self::parse_response(&response)
    }
}
