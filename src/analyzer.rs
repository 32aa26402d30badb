//! Itinerary analysis: runs the schedule and map pipelines over one text
//!
//! The two pipelines share the input text and nothing else. The schedule is
//! computed first and synchronously, so nothing that happens while geocoding
//! can take it away.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::bounds::ViewportSettings;
use crate::config::AtlasConfig;
use crate::error::AtlasError;
use crate::geocoding::{Geocoder, LookupCache, LookupReport, Resolution};
use crate::models::{DaySchedule, GeoPoint, MapViewport};
use crate::places::{ClassifiedPlace, LocationClassifier, PlaceNameExtractor};
use crate::schedule::parse_itinerary;

/// One block of generated itinerary text and what it was generated for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryInput {
    pub text: String,
    pub destination: String,
    /// Only compared against the parsed day count, never used to constrain it
    #[serde(default)]
    pub requested_days: Option<u32>,
}

impl ItineraryInput {
    pub fn new(text: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            destination: destination.into(),
            requested_days: None,
        }
    }

    #[must_use]
    pub fn with_requested_days(mut self, days: u32) -> Self {
        self.requested_days = Some(days);
        self
    }
}

/// Both structured views of an itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryView {
    pub days: Vec<DaySchedule>,
    pub points: Vec<GeoPoint>,
    /// Absent when no place could be located
    pub viewport: Option<MapViewport>,
    /// How the geocoding lookups behind `points` went
    #[serde(default)]
    pub lookups: LookupReport,
}

impl ItineraryView {
    /// The map is empty because the provider failed, not because nothing matched
    #[must_use]
    pub fn geocoding_unavailable(&self) -> bool {
        self.points.is_empty() && self.lookups.all_failed()
    }
}

pub struct ItineraryAnalyzer {
    extractor: PlaceNameExtractor,
    geocoder: Geocoder,
    viewport: ViewportSettings,
}

impl ItineraryAnalyzer {
    pub fn new(
        extractor: PlaceNameExtractor,
        geocoder: Geocoder,
        viewport: ViewportSettings,
    ) -> Self {
        Self {
            extractor,
            geocoder,
            viewport,
        }
    }

    /// Analyzer wired from configuration, including the geocoding provider
    pub fn from_config(config: &AtlasConfig) -> Result<Self> {
        Ok(Self::new(
            PlaceNameExtractor::new(config.extraction.max_candidates),
            Geocoder::from_config(&config.geocoding)?,
            ViewportSettings::from(&config.map),
        ))
    }

    /// Day-by-day schedule of the text
    #[must_use]
    pub fn parse_schedule(&self, text: &str) -> Vec<DaySchedule> {
        let days = parse_itinerary(text);

        for day in days.iter().filter(|day| !day.is_chronological()) {
            debug!("Day {} lists activities out of clock order", day.day_number);
        }
        days
    }

    /// Classified place candidates, destination first
    #[must_use]
    pub fn extract_candidates(&self, text: &str, destination: &str) -> Vec<ClassifiedPlace> {
        let candidates = self.extractor.extract(text, destination);
        debug!("Extracted {} place candidates", candidates.len());
        LocationClassifier::classify_all(candidates)
    }

    /// Geocoded points for the places in the text, with a lookup cache scoped to this call
    #[instrument(skip(self, text), fields(destination = %destination))]
    pub async fn locate_places(&self, text: &str, destination: &str) -> Resolution {
        let places = self.extract_candidates(text, destination);
        let mut cache = LookupCache::new();
        self.geocoder.resolve(&places, destination, &mut cache).await
    }

    /// Run both pipelines
    #[instrument(skip(self, input), fields(destination = %input.destination))]
    pub async fn analyze(&self, input: &ItineraryInput) -> ItineraryView {
        let days = self.parse_schedule(&input.text);

        if let Some(requested) = input.requested_days {
            let parsed = days.len();
            if usize::try_from(requested).map_or(true, |requested| requested != parsed) {
                warn!(
                    "Requested {} days but the itinerary describes {}",
                    requested, parsed
                );
            }
        }

        let Resolution { points, report } =
            self.locate_places(&input.text, &input.destination).await;
        let viewport = MapViewport::from_points(&points, &self.viewport);

        info!(
            "Analyzed itinerary: {} days, {} mapped places",
            days.len(),
            points.len()
        );

        ItineraryView {
            days,
            points,
            viewport,
            lookups: report,
        }
    }

    /// `analyze`, abandoned as soon as `cancel` fires.
    ///
    /// In-flight lookups are dropped with the analysis future.
    pub async fn analyze_until_cancelled(
        &self,
        input: &ItineraryInput,
        cancel: &CancellationToken,
    ) -> Result<ItineraryView> {
        tokio::select! {
            view = self.analyze(input) => Ok(view),
            () = cancel.cancelled() => {
                info!("Itinerary analysis cancelled");
                Err(AtlasError::Cancelled)
            }
        }
    }
}
