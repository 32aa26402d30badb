//! Tracing subscriber setup
//!
//! Logs go to stderr so command output on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

use crate::Result;
use crate::config::LoggingConfig;
use crate::error::AtlasError;

/// Filter directive for the configured level; `verbose` forces debug output for this crate
#[must_use]
pub fn filter_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        format!("{},itinerary_atlas=debug", config.level)
    } else {
        config.level.clone()
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config, verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };

    installed.map_err(|e| AtlasError::config(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: "compact".to_string(),
        };

        assert_eq!(filter_directive(&config, false), "warn");
        assert_eq!(filter_directive(&config, true), "warn,itinerary_atlas=debug");
    }
}
