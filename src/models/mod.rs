//! Data models for the itinerary atlas
//!
//! This module contains the core domain models organized by concern:
//! - Schedule: days, activities and costs parsed from itinerary text
//! - Location: coordinates, place categories and geocoded points
//! - Viewport: bounds and center used to frame points on a map

pub mod location;
pub mod schedule;
pub mod viewport;

// Re-export all public types for convenient access
pub use location::{Coordinates, GeoPoint, PlaceCategory};
pub use schedule::{Activity, Cost, DaySchedule};
pub use viewport::{Bounds, MapViewport};
