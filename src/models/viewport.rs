//! Map viewport models

use serde::{Deserialize, Serialize};

use super::location::{Coordinates, GeoPoint};

/// Axis-aligned latitude/longitude box
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    #[must_use]
    pub fn center(&self) -> Coordinates {
        Coordinates {
            latitude: (self.min_lat + self.max_lat) / 2.0,
            longitude: (self.min_lng + self.max_lng) / 2.0,
        }
    }

    #[must_use]
    pub fn contains(&self, coordinates: &Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&coordinates.latitude)
            && (self.min_lng..=self.max_lng).contains(&coordinates.longitude)
    }
}

/// Everything a map renderer needs to frame a set of points. Derived, never stored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapViewport {
    pub points: Vec<GeoPoint>,
    pub center: Coordinates,
    pub bounds: Bounds,
    pub zoom: u8,
    /// Diagonal of the unpadded box in kilometers
    pub span_km: f64,
}
