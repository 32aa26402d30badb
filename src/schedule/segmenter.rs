//! Splits raw itinerary text into per-day sections
//!
//! Sections start at a `**Day N:**` marker. Text without any marker is treated
//! as a single implicit day 1 so that non-conforming model output still yields
//! a schedule.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static DAY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*\s*(?i:day)\s+(\d+)\s*:\s*\*\*").expect("valid day marker regex")
});

/// A day number and the raw text that belongs to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySegment {
    pub day_number: u32,
    pub text: String,
}

/// Position of a day marker within the raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMarker {
    pub day_number: u32,
    /// Byte offset where the marker starts
    pub start: usize,
    /// Byte offset right after the marker
    pub end: usize,
}

pub struct TextSegmenter;

impl TextSegmenter {
    /// All well-formed day markers in order of appearance.
    /// Markers numbered 0, or too large for a `u32`, are ignored.
    #[must_use]
    pub fn markers(text: &str) -> Vec<DayMarker> {
        DAY_MARKER
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let day_number = caps.get(1)?.as_str().parse::<u32>().ok()?;
                (day_number > 0).then_some(DayMarker {
                    day_number,
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect()
    }

    /// Partition the text into ordered day segments.
    ///
    /// Preamble before the first marker is dropped. A marker with nothing
    /// after it still yields an empty day, and a repeated day number is folded
    /// into its first occurrence so day numbers stay unique.
    #[must_use]
    pub fn segment(text: &str) -> Vec<DaySegment> {
        let markers = Self::markers(text);

        if markers.is_empty() {
            debug!("No day markers found, treating the whole text as day 1");
            return vec![DaySegment {
                day_number: 1,
                text: text.trim().to_string(),
            }];
        }

        let mut segments: Vec<DaySegment> = Vec::with_capacity(markers.len());

        for (i, marker) in markers.iter().enumerate() {
            let end = markers.get(i + 1).map_or(text.len(), |next| next.start);
            let body = text[marker.end..end].trim();

            match segments
                .iter_mut()
                .find(|s| s.day_number == marker.day_number)
            {
                Some(existing) => {
                    debug!("Day {} repeated, merging sections", marker.day_number);
                    if !body.is_empty() {
                        if !existing.text.is_empty() {
                            existing.text.push('\n');
                        }
                        existing.text.push_str(body);
                    }
                }
                None => segments.push(DaySegment {
                    day_number: marker.day_number,
                    text: body.to_string(),
                }),
            }
        }

        debug!("Segmented itinerary into {} days", segments.len());
        segments
    }

    /// The day a byte offset of the text belongs to.
    ///
    /// Without markers everything is day 1; preamble before the first marker
    /// belongs to no day.
    #[must_use]
    pub fn day_at_offset(markers: &[DayMarker], offset: usize) -> Option<u32> {
        if markers.is_empty() {
            return Some(1);
        }
        markers
            .iter()
            .take_while(|marker| marker.start <= offset)
            .last()
            .map(|marker| marker.day_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_segments_follow_marker_order() {
        let text = "**Day 1:** Arrival\nCheck in\n**Day 2:** Museums\nLouvre\n**Day 3:** Departure";
        let segments = TextSegmenter::segment(text);

        let days: Vec<u32> = segments.iter().map(|s| s.day_number).collect();
        assert_eq!(days, vec![1, 2, 3]);
        assert_eq!(segments[0].text, "Arrival\nCheck in");
        assert_eq!(segments[2].text, "Departure");
    }

    #[test]
    fn test_no_markers_falls_back_to_single_day() {
        let segments = TextSegmenter::segment("* Visit Shibuya Crossing\n* Ramen dinner");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].day_number, 1);
        assert!(segments[0].text.contains("Shibuya"));
    }

    #[test]
    fn test_empty_text_still_yields_day_one() {
        let segments = TextSegmenter::segment("   \n ");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].day_number, 1);
        assert!(segments[0].text.is_empty());
    }

    #[test]
    fn test_preamble_is_dropped_and_blank_days_kept() {
        let text = "Here is your trip!\n**Day 1:**\n   \n**Day 2:** Beach day";
        let segments = TextSegmenter::segment(text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].day_number, 1);
        assert!(segments[0].text.is_empty());
        assert_eq!(segments[1].day_number, 2);
        assert_eq!(segments[1].text, "Beach day");
    }

    #[test]
    fn test_repeated_day_is_merged() {
        let text = "**Day 1:** Morning\n**Day 2:** Hike\n**Day 1:** Evening";
        let segments = TextSegmenter::segment(text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Morning\nEvening");
    }

    #[rstest]
    #[case("**Day 1:**", Some(1))]
    #[case("**day 12:**", Some(12))]
    #[case("** Day 3 : **", Some(3))]
    #[case("**Day 0:**", None)]
    #[case("**Day 99999999999:**", None)]
    #[case("Day 4:", None)]
    fn test_marker_recognition(#[case] text: &str, #[case] expected: Option<u32>) {
        let markers = TextSegmenter::markers(text);
        assert_eq!(markers.first().map(|m| m.day_number), expected);
    }

    #[test]
    fn test_day_at_offset() {
        let text = "intro **Day 1:** a **Day 2:** b";
        let markers = TextSegmenter::markers(text);
        assert_eq!(TextSegmenter::day_at_offset(&markers, 0), None);
        assert_eq!(TextSegmenter::day_at_offset(&markers, text.find(" a ").unwrap()), Some(1));
        assert_eq!(TextSegmenter::day_at_offset(&markers, text.len() - 1), Some(2));
        assert_eq!(TextSegmenter::day_at_offset(&[], 10), Some(1));
    }
}
