//! Map framing for a set of geocoded points

use tracing::debug;

use crate::config::MapConfig;
use crate::models::{Bounds, Coordinates, GeoPoint, MapViewport};

/// How a viewport is padded and zoomed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSettings {
    /// Padding added on each side as a fraction of the span
    pub padding_ratio: f64,
    /// Padding floor in degrees, so a tight cluster is not framed edge to edge
    pub min_padding_degrees: f64,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            padding_ratio: 0.1,
            min_padding_degrees: 0.01,
            min_zoom: 2,
            max_zoom: 15,
        }
    }
}

impl From<&MapConfig> for ViewportSettings {
    fn from(config: &MapConfig) -> Self {
        Self {
            padding_ratio: config.padding_ratio,
            min_padding_degrees: config.min_padding_degrees,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }
}

impl MapViewport {
    /// Frame `points`; `None` when there is nothing to frame.
    ///
    /// Longitudes are treated linearly, so a set straddling the antimeridian
    /// gets a box spanning most of the globe.
    #[must_use]
    pub fn from_points(points: &[GeoPoint], settings: &ViewportSettings) -> Option<Self> {
        let first = points.first()?;

        let mut raw = Bounds {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
        };
        for point in &points[1..] {
            raw.min_lat = raw.min_lat.min(point.latitude);
            raw.max_lat = raw.max_lat.max(point.latitude);
            raw.min_lng = raw.min_lng.min(point.longitude);
            raw.max_lng = raw.max_lng.max(point.longitude);
        }

        let lat_padding = padding(raw.max_lat - raw.min_lat, settings);
        let lng_padding = padding(raw.max_lng - raw.min_lng, settings);
        let bounds = Bounds {
            min_lat: (raw.min_lat - lat_padding).max(-90.0),
            max_lat: (raw.max_lat + lat_padding).min(90.0),
            min_lng: (raw.min_lng - lng_padding).max(-180.0),
            max_lng: (raw.max_lng + lng_padding).min(180.0),
        };

        let zoom = if raw.min_lat == raw.max_lat && raw.min_lng == raw.max_lng {
            settings.max_zoom
        } else {
            zoom_for_span(
                (bounds.max_lat - bounds.min_lat).max(bounds.max_lng - bounds.min_lng),
                settings,
            )
        };

        let span_km = diagonal_km(&raw);
        debug!(
            "Viewport over {} points: zoom {}, diagonal {:.1} km",
            points.len(),
            zoom,
            span_km
        );

        Some(Self {
            points: points.to_vec(),
            center: bounds.center(),
            bounds,
            zoom,
            span_km,
        })
    }

    /// Empty viewport on a caller-supplied default center
    #[must_use]
    pub fn fallback(center: Coordinates, zoom: u8) -> Self {
        Self {
            points: Vec::new(),
            center,
            bounds: Bounds {
                min_lat: center.latitude,
                max_lat: center.latitude,
                min_lng: center.longitude,
                max_lng: center.longitude,
            },
            zoom,
            span_km: 0.0,
        }
    }
}

fn padding(span: f64, settings: &ViewportSettings) -> f64 {
    (span * settings.padding_ratio).max(settings.min_padding_degrees)
}

/// Web-mercator style zoom: each level halves the visible degrees
fn zoom_for_span(span_degrees: f64, settings: &ViewportSettings) -> u8 {
    if span_degrees <= 0.0 {
        return settings.max_zoom;
    }

    let level = (360.0 / span_degrees).log2().floor();
    let clamped = level.clamp(f64::from(settings.min_zoom), f64::from(settings.max_zoom));
    // Clamped to a u8 range above
    clamped as u8
}

fn diagonal_km(bounds: &Bounds) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: bounds.min_lat,
            longitude: bounds.min_lng,
        },
        haversine::Location {
            latitude: bounds.max_lat,
            longitude: bounds.max_lng,
        },
        haversine::Units::Kilometers,
    )
}
