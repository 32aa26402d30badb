//! Itinerary atlas - structured views of generated travel itineraries
//!
//! Turns one block of loosely-markdown itinerary text into two independent
//! results: a day-by-day schedule of activities, and a set of geocoded,
//! categorised places with a map viewport framing them.

pub mod analyzer;
pub mod bounds;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod logging;
pub mod models;
pub mod places;
pub mod request;
pub mod schedule;

// Re-export core types for public API
pub use analyzer::{ItineraryAnalyzer, ItineraryInput, ItineraryView};
pub use bounds::ViewportSettings;
pub use config::AtlasConfig;
pub use error::{AtlasError, ErrorCode};
pub use geocoding::{
    Geocoder, GeocoderOptions, GeocodingProvider, LookupCache, LookupReport, Resolution,
};
pub use models::{Activity, Coordinates, Cost, DaySchedule, GeoPoint, MapViewport, PlaceCategory};
pub use places::{ClassifiedPlace, LocationClassifier, PlaceCandidate, PlaceNameExtractor};
pub use request::TripRequest;
pub use schedule::parse_itinerary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AtlasError>;
