//! Assigns a map category to each place candidate from lexical cues

use serde::Serialize;

use super::extractor::PlaceCandidate;
use crate::models::PlaceCategory;

const RESTAURANT_KEYWORDS: &[&str] = &[
    "restaurant", "cafe", "café", "bistro", "brasserie", "trattoria", "osteria", "pizzeria",
    "tavern", "diner", "eatery", "grill", "kitchen", "bar", "pub", "bakery", "steakhouse",
    "dining", "food",
];

const LODGING_KEYWORDS: &[&str] = &[
    "hotel", "resort", "inn", "hostel", "lodge", "suites", "guesthouse", "motel", "b&b", "bnb",
];

/// A candidate together with its final category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedPlace {
    pub name: String,
    #[serde(skip)]
    pub key: String,
    pub category: PlaceCategory,
    pub day_index: Option<u32>,
    pub context: Option<String>,
}

pub struct LocationClassifier;

impl LocationClassifier {
    /// Restaurant cues win over lodging cues; a name with neither falls back
    /// to the extraction hint, then to `Activity`. The destination is never reclassified.
    #[must_use]
    pub fn classify(candidate: &PlaceCandidate) -> PlaceCategory {
        if candidate.is_destination() {
            return PlaceCategory::Destination;
        }

        Self::classify_name(&candidate.name)
            .or(candidate.hint)
            .unwrap_or(PlaceCategory::Activity)
    }

    /// Category implied by the words of a name alone.
    ///
    /// Keywords match whole words: "Barcelona" carries no bar cue, and neither
    /// does a compound such as "Gastropub".
    #[must_use]
    pub fn classify_name(name: &str) -> Option<PlaceCategory> {
        let lowered = name.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '&'))
            .filter(|w| !w.is_empty())
            .collect();

        let has_any = |keywords: &[&str]| words.iter().any(|w| keywords.contains(w));

        if has_any(RESTAURANT_KEYWORDS) {
            Some(PlaceCategory::Restaurant)
        } else if has_any(LODGING_KEYWORDS) {
            Some(PlaceCategory::Hotel)
        } else {
            None
        }
    }

    #[must_use]
    pub fn classify_all(candidates: Vec<PlaceCandidate>) -> Vec<ClassifiedPlace> {
        candidates
            .into_iter()
            .map(|candidate| ClassifiedPlace {
                category: Self::classify(&candidate),
                name: candidate.name,
                key: candidate.key,
                day_index: candidate.day_index,
                context: candidate.context,
            })
            .collect()
    }
}
