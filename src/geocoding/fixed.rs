//! In-memory provider backed by a fixed table of places
//!
//! A stand-in for a real service when testing code built on [`Geocoder`]:
//! lookups never touch the network, and the provider records how many ran
//! and how many overlapped.
//!
//! [`Geocoder`]: super::Geocoder

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::GeocodingProvider;
use super::cache::LookupCache;
use crate::error::{AtlasError, ErrorCode};
use crate::Result;
use crate::models::Coordinates;

#[derive(Debug, Default)]
pub struct FixedProvider {
    places: HashMap<String, Coordinates>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FixedProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a place; coordinates outside the valid ranges are ignored
    #[must_use]
    pub fn with_place(mut self, query: &str, latitude: f64, longitude: f64) -> Self {
        if let Some(coordinates) = Coordinates::new(latitude, longitude) {
            self.places.insert(LookupCache::key(query), coordinates);
        }
        self
    }

    /// Make lookups of `query` fail with a network error
    #[must_use]
    pub fn with_failure(mut self, query: &str) -> Self {
        self.failing.insert(LookupCache::key(query));
        self
    }

    /// Sleep before answering every lookup
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of lookups issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of lookups that were running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

/// Counts a lookup as running until dropped, including when a timeout drops it
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(in_flight: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let running = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(running, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl GeocodingProvider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _running = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let key = LookupCache::key(query);
        if self.failing.contains(&key) {
            return Err(AtlasError::api(
                format!("Lookup of '{query}' failed"),
                ErrorCode::ApiNetworkError,
            ));
        }
        Ok(self.places.get(&key).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let provider = FixedProvider::new().with_place("Eiffel Tower, Paris", 48.8584, 2.2945);

        let found = provider.geocode("eiffel tower, paris").await.unwrap();
        assert_eq!(found, Coordinates::new(48.8584, 2.2945));
        assert_eq!(provider.geocode("Atlantis").await.unwrap(), None);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_and_invalid_places() {
        let provider = FixedProvider::new()
            .with_place("Broken", 123.0, 0.0)
            .with_failure("Flaky Tower");

        assert_eq!(provider.geocode("Broken").await.unwrap(), None);
        assert!(provider.geocode("Flaky Tower").await.is_err());
    }

    #[tokio::test]
    async fn test_timed_out_lookup_leaves_flight() {
        let provider = FixedProvider::new()
            .with_place("Paris", 48.8566, 2.3522)
            .with_delay(Duration::from_millis(200));

        let abandoned =
            tokio::time::timeout(Duration::from_millis(10), provider.geocode("Paris")).await;
        assert!(abandoned.is_err());
        assert_eq!(provider.in_flight.load(Ordering::SeqCst), 0);

        provider.geocode("Paris").await.unwrap();
        assert_eq!(provider.peak_in_flight(), 1);
        assert_eq!(provider.calls(), 2);
    }
}
