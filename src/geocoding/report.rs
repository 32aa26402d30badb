//! Outcome counts for one geocoding run
//!
//! Dropped lookups never fail the run, but the counts let a caller tell a
//! provider outage apart from an itinerary whose places simply had no match.

use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, GeoPoint};

/// Result of a single provider call after validation and timeout handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupOutcome {
    Found(Coordinates),
    /// No match, or coordinates outside the valid ranges
    NotFound,
    /// Transport, credential or quota error, or the lookup timed out
    Failed,
}

impl LookupOutcome {
    #[must_use]
    pub fn coordinates(self) -> Option<Coordinates> {
        match self {
            LookupOutcome::Found(coordinates) => Some(coordinates),
            LookupOutcome::NotFound | LookupOutcome::Failed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupReport {
    /// Queries answered from the lookup cache without a provider call
    pub cached: usize,
    /// Provider calls issued
    pub attempted: usize,
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl LookupReport {
    pub fn record(&mut self, outcome: LookupOutcome) {
        self.attempted += 1;
        match outcome {
            LookupOutcome::Found(_) => self.found += 1,
            LookupOutcome::NotFound => self.not_found += 1,
            LookupOutcome::Failed => self.failed += 1,
        }
    }

    /// Every provider call of the run errored out
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

/// Located points plus how the lookups behind them went
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub points: Vec<GeoPoint>,
    pub report: LookupReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = LookupReport::default();
        assert!(!report.all_failed());

        report.record(LookupOutcome::Failed);
        report.record(LookupOutcome::Failed);
        assert!(report.all_failed());

        report.record(LookupOutcome::NotFound);
        assert!(!report.all_failed());
        assert_eq!(report.attempted, 3);
        assert_eq!(report.failed, 2);
        assert_eq!(report.not_found, 1);
    }

    #[test]
    fn test_outcome_coordinates() {
        let paris = Coordinates::new(48.8566, 2.3522).unwrap();
        assert_eq!(LookupOutcome::Found(paris).coordinates(), Some(paris));
        assert_eq!(LookupOutcome::Failed.coordinates(), None);
    }
}
