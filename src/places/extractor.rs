//! Scans itinerary text for candidate place names

use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, trace};

use super::rules::{CompiledRule, DEFAULT_RULES, PlaceRule, SuffixSet};
use crate::error::AtlasError;
use crate::models::PlaceCategory;
use crate::schedule::{DayMarker, TextSegmenter};

/// Default number of non-destination candidates kept per itinerary
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

static DEFAULT_COMPILED: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    DEFAULT_RULES
        .iter()
        .filter_map(|rule| CompiledRule::compile(*rule).ok())
        .collect()
});

/// Capitalised words that start sentences rather than names
const LEADING_NOISE: &[&str] = &[
    "visit", "explore", "see", "go", "to", "check", "out", "dine", "eat", "lunch", "dinner",
    "breakfast", "brunch", "stay", "staying", "at", "then", "head", "walk", "enjoy", "morning",
    "afternoon", "evening", "night", "day", "the", "a", "an", "in", "take", "return", "arrive",
    "after", "afterwards", "before", "next", "finally", "spend", "tour", "discover", "admire",
    "relax", "on", "from", "hotel",
];

/// Noise words that belong to the name when a category noun follows ("Night Market")
const NAME_QUALIFIERS: &[&str] = &["morning", "afternoon", "evening", "night", "day", "tour"];

/// A raw name found in the text, before classification and geocoding
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    /// Name in its original case
    pub name: String,
    /// Lower-cased, punctuation-trimmed dedup key
    pub key: String,
    /// Category suggested by the rule that found it
    pub hint: Option<PlaceCategory>,
    pub day_index: Option<u32>,
    /// The line of the first mention
    pub context: Option<String>,
}

impl PlaceCandidate {
    /// The privileged destination candidate
    #[must_use]
    pub fn destination(name: &str) -> Self {
        let name = name.trim().to_string();
        Self {
            key: normalize_key(&name),
            name,
            hint: Some(PlaceCategory::Destination),
            day_index: None,
            context: None,
        }
    }

    #[must_use]
    pub fn is_destination(&self) -> bool {
        self.hint == Some(PlaceCategory::Destination)
    }
}

/// Case-insensitive dedup key: surrounding punctuation trimmed, whitespace collapsed
#[must_use]
pub fn normalize_key(name: &str) -> String {
    name.trim_matches(|c: char| !c.is_alphanumeric())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub struct PlaceNameExtractor {
    rules: Vec<CompiledRule>,
    max_candidates: usize,
}

impl Default for PlaceNameExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CANDIDATES)
    }
}

impl PlaceNameExtractor {
    /// Extractor over the built-in rule table
    #[must_use]
    pub fn new(max_candidates: usize) -> Self {
        Self {
            rules: DEFAULT_COMPILED
                .iter()
                .map(|compiled| CompiledRule {
                    rule: compiled.rule,
                    regex: compiled.regex.clone(),
                })
                .collect(),
            max_candidates,
        }
    }

    /// Extractor over a custom rule table, tried in the given order
    pub fn with_rules(rules: &[PlaceRule], max_candidates: usize) -> Result<Self, AtlasError> {
        let rules = rules
            .iter()
            .map(|rule| CompiledRule::compile(*rule))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules,
            max_candidates,
        })
    }

    /// Collect place candidates from the full text.
    ///
    /// The destination (if non-blank) is always first; at most
    /// `max_candidates` others follow in rule order, then text order.
    #[must_use]
    pub fn extract(&self, text: &str, destination: &str) -> Vec<PlaceCandidate> {
        let markers = TextSegmenter::markers(text);
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<PlaceCandidate> = Vec::new();

        let destination = PlaceCandidate::destination(destination);
        if !destination.key.is_empty() {
            seen.insert(destination.key.clone());
            candidates.push(destination);
        }
        let destination_count = candidates.len();

        'rules: for compiled in &self.rules {
            for caps in compiled.regex.captures_iter(text) {
                if candidates.len() - destination_count >= self.max_candidates {
                    debug!("Candidate cap of {} reached", self.max_candidates);
                    break 'rules;
                }

                let Some(phrase) = caps.get(1) else {
                    continue;
                };
                let Some(name) = clean_phrase(phrase.as_str()) else {
                    trace!("Discarding generic phrase '{}'", phrase.as_str());
                    continue;
                };

                let key = normalize_key(&name);
                if !seen.insert(key.clone()) {
                    continue;
                }

                trace!("Rule '{}' found '{}'", compiled.rule.name, name);
                candidates.push(PlaceCandidate {
                    name,
                    key,
                    hint: compiled.rule.hint,
                    day_index: TextSegmenter::day_at_offset(&markers, phrase.start()),
                    context: context_line(text, &markers, phrase.start()),
                });
            }
        }

        debug!(
            "Extracted {} place candidates ({} besides the destination)",
            candidates.len(),
            candidates.len() - destination_count
        );
        candidates
    }
}

/// Strip sentence-starter words and reject phrases that are only a category noun
fn clean_phrase(phrase: &str) -> Option<String> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let nouns = SuffixSet::Any.nouns();
    let first_name_word = (0..words.len()).find(|&i| {
        let word = words[i].to_lowercase();
        !LEADING_NOISE.contains(&word.as_str())
            || (NAME_QUALIFIERS.contains(&word.as_str())
                && words.get(i + 1).is_some_and(|next| nouns.contains(next)))
    })?;
    let words = &words[first_name_word..];

    if words.len() == 1 && nouns.contains(&words[0]) {
        return None;
    }

    let name = words.join(" ");
    let name = name.trim_matches(|c: char| !c.is_alphanumeric());
    (!name.is_empty()).then(|| name.to_string())
}

fn context_line(text: &str, markers: &[DayMarker], offset: usize) -> Option<String> {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    // Skip a day marker sharing the line
    let start = markers
        .iter()
        .filter(|m| m.end <= offset && m.end > line_start)
        .map(|m| m.end)
        .max()
        .unwrap_or(line_start);
    let end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    let line = text[start..end]
        .replace("**", "")
        .trim()
        .trim_start_matches(['-', '*', '•', '+'])
        .trim()
        .to_string();
    (!line.is_empty()).then_some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names(candidates: &[PlaceCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_destination_is_first_and_deduplicated() {
        let text = "**Day 1:** Visit the Louvre Museum\n**Day 2:** Back at the Louvre Museum for the wing we missed";
        let candidates = PlaceNameExtractor::default().extract(text, "Paris");

        assert_eq!(names(&candidates), vec!["Paris", "Louvre Museum"]);
        assert!(candidates[0].is_destination());
        assert_eq!(candidates[1].day_index, Some(1));
        assert_eq!(candidates[1].context.as_deref(), Some("Visit the Louvre Museum"));
    }

    #[test]
    fn test_case_insensitive_dedup() {
        let text = "See Central Park early.\nCentral Park is busy at noon.\nexplore CENTRAL PARK";
        let candidates = PlaceNameExtractor::default().extract(text, "New York");
        let parks = candidates.iter().filter(|c| c.key == "central park").count();
        assert_eq!(parks, 1);
    }

    #[test]
    fn test_catch_all_strips_sentence_starters() {
        let candidates =
            PlaceNameExtractor::default().extract("Then Trevi Fountain Square at dusk", "Rome");
        assert_eq!(names(&candidates), vec!["Rome", "Trevi Fountain Square"]);
        assert_eq!(candidates[1].hint, None);
    }

    #[test]
    fn test_rule_hints() {
        let text = "Dinner at Chez Janou Bistro\nStay at Le Pigalle Hotel\nExplore Montmartre Hill";
        let candidates = PlaceNameExtractor::default().extract(text, "Paris");

        let hint_of = |name: &str| candidates.iter().find(|c| c.name == name).and_then(|c| c.hint);
        assert_eq!(hint_of("Montmartre Hill"), Some(PlaceCategory::Activity));
        assert_eq!(hint_of("Chez Janou Bistro"), Some(PlaceCategory::Restaurant));
        assert_eq!(hint_of("Le Pigalle Hotel"), Some(PlaceCategory::Hotel));
    }

    #[test]
    fn test_candidate_cap_excludes_destination() {
        let text = [
            "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota",
            "Kappa", "Lambda", "Mu", "Nu", "Xi", "Omicron",
        ]
        .iter()
        .map(|name| format!("Visit {name} Museum"))
            .collect::<Vec<_>>()
            .join("\n");
        let candidates = PlaceNameExtractor::new(10).extract(&text, "Lyon");
        assert_eq!(candidates.len(), 11);
        assert_eq!(candidates[0].name, "Lyon");
        assert_eq!(candidates[10].name, "Kappa Museum");
    }

    #[test]
    fn test_blank_destination_is_skipped() {
        let candidates = PlaceNameExtractor::default().extract("Visit Sagrada Familia Church", "  ");
        assert_eq!(names(&candidates), vec!["Sagrada Familia Church"]);
    }

    #[test]
    fn test_destination_mention_is_not_repeated() {
        let candidates = PlaceNameExtractor::default().extract("Visit Hyde Park", "hyde park");
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_custom_rules() {
        let rules = [PlaceRule {
            name: "markets-only",
            prefix: Some("shop at"),
            suffixes: SuffixSet::Landmark,
            hint: Some(PlaceCategory::Activity),
        }];
        let extractor = PlaceNameExtractor::with_rules(&rules, 5).unwrap();
        let candidates =
            extractor.extract("Shop at Borough Market, then visit Tate Modern Museum", "London");
        assert_eq!(names(&candidates), vec!["London", "Borough Market"]);
    }

    #[rstest]
    #[case("  **Louvre Museum**, ", "louvre museum")]
    #[case("Louvre   Museum", "louvre museum")]
    #[case("\"Café de Flore\"", "café de flore")]
    fn test_normalize_key(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_key(raw), expected);
    }

    #[test]
    fn test_generic_noun_alone_is_rejected() {
        assert_eq!(clean_phrase("Visit Museum"), None);
        assert_eq!(clean_phrase("The Tower"), None);
        assert_eq!(clean_phrase("Morning Eiffel Tower").as_deref(), Some("Eiffel Tower"));
    }

    #[rstest]
    #[case("Night Market", Some("Night Market"))]
    #[case("Then Night Market", Some("Night Market"))]
    #[case("Evening Night Market", Some("Night Market"))]
    #[case("Visit Day Spa Hotel", Some("Spa Hotel"))]
    #[case("Night Eiffel Tower", Some("Eiffel Tower"))]
    #[case("Night", None)]
    fn test_time_of_day_before_category_noun(#[case] phrase: &str, #[case] expected: Option<&str>) {
        assert_eq!(clean_phrase(phrase).as_deref(), expected);
    }
}
