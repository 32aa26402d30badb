//! OpenStreetMap Nominatim geocoding (free, keyless, one request per second)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::GeocodingProvider;
use super::http::{build_client, get_json};
use super::rate_limit::{RateLimiter, SharedRateLimiter};
use crate::Result;
use crate::models::Coordinates;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// One entry of a Nominatim `/search` response
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    pub display_name: Option<String>,
}

pub struct NominatimProvider {
    client: Client,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

impl NominatimProvider {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        requests_per_second: u32,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter: SharedRateLimiter::new(RateLimiter::per_second(requests_per_second)),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// First usable result of a search response
    #[must_use]
    pub fn parse_results(results: &[NominatimPlace]) -> Option<Coordinates> {
        results.iter().find_map(|place| {
            let lat = place.lat.trim().parse::<f64>().ok()?;
            let lon = place.lon.trim().parse::<f64>().ok()?;
            Coordinates::new(lat, lon)
        })
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    #[instrument(skip(self), fields(provider = "nominatim"))]
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>> {
        self.rate_limiter.acquire().await;

        let url = self.search_url(query);
        let results: Vec<NominatimPlace> = get_json(&self.client, &url, &url).await?;

        if let Some(first) = results.first() {
            debug!(
                "Nominatim matched '{}' to {}",
                query,
                first.display_name.as_deref().unwrap_or("<unnamed>")
            );
        }
        Ok(Self::parse_results(&results))
    }
}
