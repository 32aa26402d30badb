//! Per-call memo of geocoding lookups
//!
//! A `LookupCache` lives for exactly one analysis. It is handed to the
//! geocoder explicitly so identical names resolve once per run and tests can
//! inspect what was looked up.

use std::collections::HashMap;

use crate::models::Coordinates;

#[derive(Debug, Default, Clone)]
pub struct LookupCache {
    /// `None` values record lookups that failed, so they are not retried this run
    entries: HashMap<String, Option<Coordinates>>,
}

impl LookupCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive, whitespace-normalized cache key
    #[must_use]
    pub fn key(query: &str) -> String {
        query
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// `None` if never looked up, `Some(None)` if the lookup failed
    #[must_use]
    pub fn get(&self, query: &str) -> Option<Option<Coordinates>> {
        self.entries.get(&Self::key(query)).copied()
    }

    #[must_use]
    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(&Self::key(query))
    }

    pub fn insert(&mut self, query: &str, result: Option<Coordinates>) {
        self.entries.insert(Self::key(query), result);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of cached lookups that produced coordinates
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.entries.values().filter(|v| v.is_some()).count()
    }
}
