//! Configuration management for itinerary atlas
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::error::AtlasError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Geocoding provider configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Place extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Map viewport configuration
    #[serde(default)]
    pub map: MapConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which geocoding service backs the lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenStreetMap Nominatim: free and keyless, coarser matching
    #[default]
    Nominatim,
    /// Google Maps Geocoding: needs an API key, more precise for businesses
    Google,
}

/// Geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    /// Provider endpoint override
    pub base_url: Option<String>,
    /// Required by the google provider
    pub api_key: Option<String>,
    /// User agent sent with every request (Nominatim rejects anonymous clients)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-lookup timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u64,
    /// Lookups in flight at once
    #[serde(default = "default_geocoding_concurrency")]
    pub concurrency: usize,
    /// Client-side request budget per second
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    /// Append the destination to place queries ("Louvre Museum, Paris")
    #[serde(default = "default_qualify_with_destination")]
    pub qualify_with_destination: bool,
}

/// Place extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum number of places kept besides the destination
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

/// Map viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_padding_ratio")]
    pub padding_ratio: f64,
    #[serde(default = "default_min_padding_degrees")]
    pub min_padding_degrees: f64,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u8,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    /// Zoom of the world view shown when nothing could be located
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, compact or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_user_agent() -> String {
    format!("itinerary-atlas/{}", env!("CARGO_PKG_VERSION"))
}

fn default_geocoding_timeout() -> u64 {
    10
}

fn default_geocoding_concurrency() -> usize {
    1
}

fn default_requests_per_second() -> u32 {
    1
}

fn default_qualify_with_destination() -> bool {
    true
}

fn default_max_candidates() -> usize {
    crate::places::DEFAULT_MAX_CANDIDATES
}

fn default_padding_ratio() -> f64 {
    0.1
}

fn default_min_padding_degrees() -> f64 {
    0.01
}

fn default_min_zoom() -> u8 {
    2
}

fn default_max_zoom() -> u8 {
    15
}

fn default_zoom() -> u8 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: None,
            api_key: None,
            user_agent: default_user_agent(),
            timeout_seconds: default_geocoding_timeout(),
            concurrency: default_geocoding_concurrency(),
            requests_per_second: default_requests_per_second(),
            qualify_with_destination: default_qualify_with_destination(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            padding_ratio: default_padding_ratio(),
            min_padding_degrees: default_min_padding_degrees(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            default_zoom: default_zoom(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AtlasConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides such as ATLAS_GEOCODING__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("ATLAS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: AtlasConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("itinerary-atlas").join("config.toml"))
    }

    /// Apply default values to blank configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.user_agent.trim().is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_geocoding_timeout();
        }
        if self.geocoding.concurrency == 0 {
            self.geocoding.concurrency = default_geocoding_concurrency();
        }
        if self.geocoding.requests_per_second == 0 {
            self.geocoding.requests_per_second = default_requests_per_second();
        }
        if self
            .geocoding
            .base_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.geocoding.base_url = None;
        }
        if self.extraction.max_candidates == 0 {
            self.extraction.max_candidates = default_max_candidates();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// The google provider cannot run without a key
    pub fn validate_api_keys(&self) -> Result<()> {
        let key = self.geocoding.api_key.as_deref().map(str::trim);

        if self.geocoding.provider == ProviderKind::Google && key.is_none_or(str::is_empty) {
            return Err(AtlasError::config(
                "The google geocoding provider requires geocoding.api_key (or ATLAS_GEOCODING__API_KEY)",
            )
            .into());
        }

        if key.is_some_and(|key| key.len() > 200) {
            return Err(AtlasError::config(
                "Geocoding API key appears to be invalid (too long). Please check your API key.",
            )
            .into());
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=60).contains(&self.geocoding.timeout_seconds) {
            return Err(AtlasError::config(
                "Geocoding timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        if !(1..=3).contains(&self.geocoding.concurrency) {
            return Err(AtlasError::config(
                "Geocoding concurrency must be between 1 and 3",
            )
            .into());
        }

        if self.geocoding.requests_per_second > 50 {
            return Err(AtlasError::config(
                "Geocoding requests per second cannot exceed 50",
            )
            .into());
        }

        if !(1..=50).contains(&self.extraction.max_candidates) {
            return Err(AtlasError::config(
                "Maximum place candidates must be between 1 and 50",
            )
            .into());
        }

        let map = &self.map;
        if map.max_zoom > 20 || map.min_zoom > map.max_zoom {
            return Err(AtlasError::config(format!(
                "Invalid zoom range {}..={}: zoom levels go from 0 to 20",
                map.min_zoom, map.max_zoom
            ))
            .into());
        }

        if !(map.min_zoom..=map.max_zoom).contains(&map.default_zoom) {
            return Err(AtlasError::config(format!(
                "Default zoom {} is outside {}..={}",
                map.default_zoom, map.min_zoom, map.max_zoom
            ))
            .into());
        }

        if !(0.0..=1.0).contains(&map.padding_ratio) {
            return Err(AtlasError::config("Map padding ratio must be between 0 and 1").into());
        }

        if !(0.0..=10.0).contains(&map.min_padding_degrees) {
            return Err(AtlasError::config(
                "Minimum map padding must be between 0 and 10 degrees",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AtlasError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AtlasError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let is_http = |url: &str| url.starts_with("http://") || url.starts_with("https://");
        if self.geocoding.base_url.as_deref().is_some_and(|url| !is_http(url)) {
            return Err(AtlasError::config(
                "Geocoding base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
