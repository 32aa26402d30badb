//! Place extraction
//!
//! - Rules: the ordered table of verb/noun patterns
//! - Extractor: candidate names with deduplication and a volume cap
//! - Classifier: destination / activity / restaurant / hotel categories

pub mod classifier;
pub mod extractor;
pub mod rules;

pub use classifier::{ClassifiedPlace, LocationClassifier};
pub use extractor::{DEFAULT_MAX_CANDIDATES, PlaceCandidate, PlaceNameExtractor, normalize_key};
pub use rules::{DEFAULT_RULES, PlaceRule, SuffixSet};
