//! Schedule parsing
//!
//! Pure, synchronous conversion of itinerary text into ordered day schedules:
//! - Segmenter: splits the text on `**Day N:**` markers
//! - Activity: separates description, heading and activities within a day

pub mod activity;
pub mod segmenter;

pub use activity::ActivityExtractor;
pub use segmenter::{DayMarker, DaySegment, TextSegmenter};

use crate::models::DaySchedule;
use tracing::instrument;

/// Parse raw itinerary text into day schedules.
///
/// Never fails: text without day markers becomes a single day 1.
#[instrument(level = "debug", skip(text), fields(len = text.len()))]
#[must_use]
pub fn parse_itinerary(text: &str) -> Vec<DaySchedule> {
    TextSegmenter::segment(text)
        .iter()
        .map(ActivityExtractor::extract)
        .collect()
}
