//! Geocoding of classified place candidates
//!
//! The [`Geocoder`] turns classified places into map points through a
//! pluggable [`GeocodingProvider`]. A lookup that fails for any reason
//! (network error, timeout, no match, invalid coordinates) only drops that
//! place; the remaining points are still returned, together with a
//! [`LookupReport`] counting how the lookups went.

pub mod cache;
pub mod fixed;
pub mod google;
mod http;
pub mod nominatim;
pub mod rate_limit;
pub mod report;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub use cache::LookupCache;
pub use fixed::FixedProvider;
pub use google::GoogleGeocodingProvider;
pub use nominatim::NominatimProvider;
pub use report::{LookupOutcome, LookupReport, Resolution};

use crate::Result;
use crate::config::{GeocodingConfig, ProviderKind};
use crate::models::{Coordinates, GeoPoint, PlaceCategory};
use crate::places::ClassifiedPlace;

/// External service resolving a free-text query to coordinates
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the service has no match for the query
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocoderOptions {
    /// Upper bound for a single lookup
    pub timeout: Duration,
    /// Lookups allowed in flight at once
    pub concurrency: usize,
    /// Append the destination to non-destination queries
    pub qualify_with_destination: bool,
}

impl Default for GeocoderOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            concurrency: 1,
            qualify_with_destination: true,
        }
    }
}

impl From<&GeocodingConfig> for GeocoderOptions {
    fn from(config: &GeocodingConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_seconds),
            concurrency: config.concurrency,
            qualify_with_destination: config.qualify_with_destination,
        }
    }
}

#[derive(Clone)]
pub struct Geocoder {
    provider: Arc<dyn GeocodingProvider>,
    options: GeocoderOptions,
}

impl Geocoder {
    pub fn new(provider: Arc<dyn GeocodingProvider>, options: GeocoderOptions) -> Self {
        Self { provider, options }
    }

    /// Geocoder backed by the provider selected in the configuration
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        Ok(Self::new(build_provider(config)?, GeocoderOptions::from(config)))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn options(&self) -> &GeocoderOptions {
        &self.options
    }

    /// Text sent to the provider for a place
    #[must_use]
    pub fn query_for(&self, place: &ClassifiedPlace, destination: &str) -> String {
        let destination = destination.trim();
        if place.category == PlaceCategory::Destination
            || !self.options.qualify_with_destination
            || destination.is_empty()
        {
            place.name.clone()
        } else {
            format!("{}, {}", place.name, destination)
        }
    }

    /// Resolve places to points, in input order.
    ///
    /// Queries already in `cache` are not sent again; every query sent is
    /// recorded in `cache`, failures included. The report only counts
    /// queries of this call.
    #[instrument(skip(self, places, cache), fields(provider = self.provider.name(), places = places.len()))]
    pub async fn resolve(
        &self,
        places: &[ClassifiedPlace],
        destination: &str,
        cache: &mut LookupCache,
    ) -> Resolution {
        let queries: Vec<String> = places
            .iter()
            .map(|place| self.query_for(place, destination))
            .collect();

        let mut scheduled = HashSet::new();
        let pending: Vec<String> = queries
            .iter()
            .filter(|query| !cache.contains(query) && scheduled.insert(LookupCache::key(query)))
            .cloned()
            .collect();

        debug!(
            "Geocoding {} unique queries ({} already cached)",
            pending.len(),
            queries.len().saturating_sub(pending.len())
        );

        let provider = self.provider.as_ref();
        let timeout = self.options.timeout;
        let mut report = LookupReport {
            cached: queries.len().saturating_sub(pending.len()),
            ..LookupReport::default()
        };

        let outcomes: Vec<(String, LookupOutcome)> = stream::iter(pending)
            .map(|query| async move {
                let outcome = lookup(provider, &query, timeout).await;
                (query, outcome)
            })
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;

        for (query, outcome) in outcomes {
            report.record(outcome);
            cache.insert(&query, outcome.coordinates());
        }

        let points: Vec<GeoPoint> = places
            .iter()
            .zip(&queries)
            .filter_map(|(place, query)| {
                let coordinates = cache.get(query).flatten()?;
                let mut point = GeoPoint::new(place.name.clone(), coordinates, place.category);
                point.description = place.context.clone();
                point.day_index = place.day_index;
                Some(point)
            })
            .collect();

        info!(
            "Located {} of {} places",
            points.len(),
            places.len()
        );
        if report.all_failed() {
            warn!(
                "All {} {} lookups failed",
                report.attempted,
                self.provider.name()
            );
        }
        Resolution { points, report }
    }
}

/// One provider call; errors are logged and reduced to an outcome
async fn lookup(
    provider: &dyn GeocodingProvider,
    query: &str,
    timeout: Duration,
) -> LookupOutcome {
    match tokio::time::timeout(timeout, provider.geocode(query)).await {
        Ok(Ok(Some(coordinates))) if coordinates.is_valid() => {
            debug!("Geocoded '{}' to {}", query, coordinates.format_coordinates());
            LookupOutcome::Found(coordinates)
        }
        Ok(Ok(Some(coordinates))) => {
            warn!(
                "Dropping '{}': provider returned invalid coordinates ({}, {})",
                query, coordinates.latitude, coordinates.longitude
            );
            LookupOutcome::NotFound
        }
        Ok(Ok(None)) => {
            warn!("Dropping '{}': no match", query);
            LookupOutcome::NotFound
        }
        Ok(Err(e)) => {
            warn!("Dropping '{}': {}", query, e);
            LookupOutcome::Failed
        }
        Err(_) => {
            warn!("Dropping '{}': lookup timed out after {:?}", query, timeout);
            LookupOutcome::Failed
        }
    }
}

/// Instantiate the provider named by the configuration
pub fn build_provider(config: &GeocodingConfig) -> Result<Arc<dyn GeocodingProvider>> {
    let timeout = Duration::from_secs(config.timeout_seconds);

    let provider: Arc<dyn GeocodingProvider> = match config.provider {
        ProviderKind::Nominatim => Arc::new(NominatimProvider::new(
            config
                .base_url
                .as_deref()
                .unwrap_or(nominatim::DEFAULT_NOMINATIM_URL),
            &config.user_agent,
            timeout,
            config.requests_per_second,
        )?),
        ProviderKind::Google => Arc::new(GoogleGeocodingProvider::new(
            config.base_url.as_deref().unwrap_or(google::DEFAULT_GOOGLE_URL),
            config.api_key.as_deref().unwrap_or_default(),
            &config.user_agent,
            timeout,
        )?),
    };

    info!("Using {} geocoding provider", provider.name());
    Ok(provider)
}
