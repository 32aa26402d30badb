//! Declarative extraction rules for place names
//!
//! Each rule pairs an optional verb prefix with a set of category nouns the
//! captured phrase must end in. Rules are tried in table order, which is also
//! the priority order when the candidate cap kicks in.

use regex::Regex;

use crate::error::AtlasError;
use crate::models::PlaceCategory;

pub const LANDMARK_NOUNS: &[&str] = &[
    "Museum", "Park", "Temple", "Church", "Cathedral", "Palace", "Castle", "Tower", "Bridge",
    "Market", "Square", "Garden", "Beach", "Lake", "Mountain", "Hill", "Center", "Centre",
    "Stadium", "Theatre", "Theater", "Library", "University", "College",
];

pub const RESTAURANT_NOUNS: &[&str] = &[
    "Restaurant", "Café", "Cafe", "Bistro", "Brasserie", "Trattoria", "Osteria", "Pizzeria",
    "Tavern", "Diner", "Eatery", "Grill", "Kitchen", "Bar", "Pub", "Bakery",
];

pub const LODGING_NOUNS: &[&str] = &[
    "Hotel", "Resort", "Inn", "Hostel", "Lodge", "Suites", "Guesthouse", "Motel",
];

/// Which noun table a rule's phrase has to end in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixSet {
    Landmark,
    Restaurant,
    Lodging,
    /// Any of the above
    Any,
}

impl SuffixSet {
    #[must_use]
    pub fn nouns(self) -> Vec<&'static str> {
        match self {
            SuffixSet::Landmark => LANDMARK_NOUNS.to_vec(),
            SuffixSet::Restaurant => RESTAURANT_NOUNS.to_vec(),
            SuffixSet::Lodging => LODGING_NOUNS.to_vec(),
            SuffixSet::Any => LANDMARK_NOUNS
                .iter()
                .chain(RESTAURANT_NOUNS)
                .chain(LODGING_NOUNS)
                .copied()
                .collect(),
        }
    }
}

/// One row of the extraction table
#[derive(Debug, Clone, Copy)]
pub struct PlaceRule {
    pub name: &'static str,
    /// Alternation of verb phrases, matched case-insensitively. `None` is a bare match.
    pub prefix: Option<&'static str>,
    pub suffixes: SuffixSet,
    /// Category to fall back on when the name itself carries no cue
    pub hint: Option<PlaceCategory>,
}

pub const DEFAULT_RULES: &[PlaceRule] = &[
    PlaceRule {
        name: "sightseeing",
        prefix: Some("visit|explore|see|go to|check out"),
        suffixes: SuffixSet::Landmark,
        hint: Some(PlaceCategory::Activity),
    },
    PlaceRule {
        name: "dining",
        prefix: Some("dine at|eat at|lunch at|dinner at|breakfast at|brunch at"),
        suffixes: SuffixSet::Restaurant,
        hint: Some(PlaceCategory::Restaurant),
    },
    PlaceRule {
        name: "lodging",
        prefix: Some("stay at|staying at|check into|check in at|hotel:?"),
        suffixes: SuffixSet::Lodging,
        hint: Some(PlaceCategory::Hotel),
    },
    PlaceRule {
        name: "catch-all",
        prefix: None,
        suffixes: SuffixSet::Any,
        hint: None,
    },
];

// Capitalised words, optionally joined by lower-case particles ("Musée de la Vie")
const PHRASE_WORD: &str = r"\p{Lu}[\p{L}\p{M}'’-]*[ \t]+(?:(?:of|de|del|des|du|di|la|le|the)[ \t]+)?";

/// A rule with its regex compiled. Group 1 is the place phrase.
#[derive(Debug)]
pub struct CompiledRule {
    pub rule: PlaceRule,
    pub regex: Regex,
}

impl CompiledRule {
    pub fn compile(rule: PlaceRule) -> Result<Self, AtlasError> {
        let nouns = rule
            .suffixes
            .nouns()
            .iter()
            .map(|noun| regex::escape(noun))
            .collect::<Vec<_>>()
            .join("|");

        let phrase = format!(r"((?:{PHRASE_WORD}){{1,5}}(?:{nouns}))\b");
        let pattern = match rule.prefix {
            Some(prefix) => format!(r"\b(?i:{prefix})[ \t]+(?:(?i:the)[ \t]+)?{phrase}"),
            None => format!(r"\b{phrase}"),
        };

        let regex = Regex::new(&pattern).map_err(|e| {
            AtlasError::config(format!("Invalid place rule '{}': {e}", rule.name))
        })?;

        Ok(Self { rule, regex })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases(rule: PlaceRule, text: &str) -> Vec<String> {
        let compiled = CompiledRule::compile(rule).unwrap();
        compiled
            .regex
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    #[test]
    fn test_default_rules_compile() {
        for rule in DEFAULT_RULES {
            assert!(CompiledRule::compile(*rule).is_ok(), "rule {} failed", rule.name);
        }
    }

    #[test]
    fn test_sightseeing_rule() {
        let found = phrases(
            DEFAULT_RULES[0],
            "In the morning visit the Louvre Museum, then explore Luxembourg Garden.",
        );
        assert_eq!(found, vec!["Louvre Museum", "Luxembourg Garden"]);
    }

    #[test]
    fn test_dining_rule_requires_restaurant_noun() {
        let found = phrases(
            DEFAULT_RULES[1],
            "Dinner at Le Comptoir Bistro. Lunch at the Eiffel Tower.",
        );
        assert_eq!(found, vec!["Le Comptoir Bistro"]);
    }

    #[test]
    fn test_lodging_rule() {
        let found = phrases(DEFAULT_RULES[2], "Stay at Park Hyatt Vendome Hotel tonight");
        assert_eq!(found, vec!["Park Hyatt Vendome Hotel"]);
    }

    #[test]
    fn test_phrases_do_not_span_lines() {
        let found = phrases(DEFAULT_RULES[3], "Morning coffee\nEiffel Tower");
        assert_eq!(found, vec!["Eiffel Tower"]);
    }

    #[test]
    fn test_particles_inside_names() {
        let found = phrases(DEFAULT_RULES[3], "We stroll through the Jardin des Tuileries Garden");
        assert_eq!(found, vec!["Jardin des Tuileries Garden"]);
    }

    #[test]
    fn test_plural_noun_does_not_match() {
        assert!(phrases(DEFAULT_RULES[3], "The Vatican Museums open at nine").is_empty());
    }

    #[test]
    fn test_any_suffix_set_covers_all_tables() {
        let any = SuffixSet::Any.nouns();
        assert_eq!(
            any.len(),
            LANDMARK_NOUNS.len() + RESTAURANT_NOUNS.len() + LODGING_NOUNS.len()
        );
    }
}
