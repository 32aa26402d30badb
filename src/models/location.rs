//! Geographic models: coordinates, place categories and geocoded points

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated latitude/longitude pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting anything outside the valid ranges
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let coordinates = Self {
            latitude,
            longitude,
        };
        coordinates.is_valid().then_some(coordinates)
    }

    /// Both components are finite and within [-90,90] / [-180,180]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Format as a short coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Semantic category of a point of interest, used by the map renderer for icons
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Destination,
    Activity,
    Restaurant,
    Hotel,
}

impl PlaceCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceCategory::Destination => "destination",
            PlaceCategory::Activity => "activity",
            PlaceCategory::Restaurant => "restaurant",
            PlaceCategory::Hotel => "hotel",
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A geocoded, categorised point ready for map rendering
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Display name in its original case
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: PlaceCategory,
    /// Line of the itinerary the place was first mentioned in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Day of the itinerary the place was first mentioned on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_index: Option<u32>,
}

impl GeoPoint {
    #[must_use]
    pub fn new(name: String, coordinates: Coordinates, category: PlaceCategory) -> Self {
        Self {
            name,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            category,
            description: None,
            day_index: None,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
