//! Error types and handling for the itinerary atlas

use std::collections::HashMap;
use thiserror::Error;

/// Machine-readable classification of API failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The provider could not be reached or timed out
    ApiNetworkError,
    /// The provider answered with something we could not parse
    ApiInvalidResponse,
    /// The provider rejected our credentials
    ApiUnauthorized,
    /// The provider throttled us
    ApiRateLimit,
    /// The provider has no match for the query
    ApiLocationNotFound,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ApiNetworkError => "api_network_error",
            ErrorCode::ApiInvalidResponse => "api_invalid_response",
            ErrorCode::ApiUnauthorized => "api_unauthorized",
            ErrorCode::ApiRateLimit => "api_rate_limit",
            ErrorCode::ApiLocationNotFound => "api_location_not_found",
        }
    }
}

/// Main error type for the itinerary atlas
#[derive(Error, Debug)]
pub enum AtlasError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Geocoding API communication errors
    #[error("API error ({}): {message}", .code.as_str())]
    Api {
        message: String,
        code: ErrorCode,
        context: HashMap<String, String>,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The caller abandoned the analysis
    #[error("Analysis cancelled")]
    Cancelled,
}

impl AtlasError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error without extra context
    pub fn api<S: Into<String>>(message: S, code: ErrorCode) -> Self {
        Self::api_with_context(message, code, HashMap::new())
    }

    /// Create a new API error carrying diagnostic key/value pairs
    pub fn api_with_context<S: Into<String>>(
        message: S,
        code: ErrorCode,
        context: HashMap<String, String>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            code,
            context,
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// The API error code, if this is an API error
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            AtlasError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AtlasError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            AtlasError::Api { code, .. } => match code {
                ErrorCode::ApiUnauthorized => {
                    "The geocoding provider rejected the API key.".to_string()
                }
                ErrorCode::ApiRateLimit => {
                    "The geocoding provider is throttling requests. Try again later.".to_string()
                }
                _ => "Unable to reach the geocoding service. Please check your internet connection."
                    .to_string(),
            },
            AtlasError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            AtlasError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            AtlasError::Cancelled => "The analysis was cancelled.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = AtlasError::config("missing API key");
        assert!(matches!(config_err, AtlasError::Config { .. }));

        let api_err = AtlasError::api("connection failed", ErrorCode::ApiNetworkError);
        assert!(matches!(api_err, AtlasError::Api { .. }));
        assert_eq!(api_err.code(), Some(ErrorCode::ApiNetworkError));

        let validation_err = AtlasError::validation("destination too short");
        assert!(matches!(validation_err, AtlasError::Validation { .. }));
        assert_eq!(validation_err.code(), None);
    }

    #[test]
    fn test_user_messages() {
        let config_err = AtlasError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let api_err = AtlasError::api("test", ErrorCode::ApiNetworkError);
        assert!(api_err.user_message().contains("Unable to reach"));

        let auth_err = AtlasError::api("test", ErrorCode::ApiUnauthorized);
        assert!(auth_err.user_message().contains("API key"));

        let validation_err = AtlasError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_api_error_display_includes_code() {
        let err = AtlasError::api("boom", ErrorCode::ApiRateLimit);
        assert_eq!(err.to_string(), "API error (api_rate_limit): boom");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let atlas_err: AtlasError = io_err.into();
        assert!(matches!(atlas_err, AtlasError::Io { .. }));
    }
}
