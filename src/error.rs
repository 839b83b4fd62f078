/*!
 * Error handling for NPI Registry client operations
 *
 * Every failure surfaces to the caller as an `NpiRegistryError`. Variants carry
 * enough context (URL, status, offending field) to produce a helpful message.
 */

use thiserror::Error;

use crate::response::ApiErrorDetail;

/// NPI Registry client result type
pub type Result<T> = std::result::Result<T, NpiRegistryError>;

/// Error types returned by the client
#[derive(Error, Debug)]
pub enum NpiRegistryError {
    /// Transport failure or non-success HTTP status
    #[error("Request error: {message}")]
    Request {
        message: String,
        url: Option<String>,
        status: Option<u16>,
        suggestion: Option<String>,
    },

    /// Valid request, but the registry has no matching provider
    #[error("Provider not found: NPI {npi}")]
    NotFound {
        npi: String,
    },

    /// Malformed input, either caught locally or reported by the registry
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        value: Option<String>,
        suggestion: Option<String>,
    },

    /// Response body did not match the expected JSON shape
    #[error("Decode error: {message}")]
    Decode {
        message: String,
    },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing errors
    #[error("CSV error: {message}")]
    Csv {
        message: String,
        line: Option<u64>,
    },

    /// JSON serialization errors during export
    #[error("JSON error: {message}")]
    Json {
        message: String,
    },

    /// Chart rendering errors
    #[error("Chart error: {message}")]
    Chart {
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        suggestion: Option<String>,
    },
}

impl NpiRegistryError {
    /// Create a validation error for a malformed NPI
    pub fn invalid_npi(npi: &str) -> Self {
        let (message, suggestion) = if npi.is_empty() {
            ("NPI cannot be empty".to_string(),
             "Provide a valid 10-digit NPI number".to_string())
        } else if npi.len() != 10 {
            (format!("NPI must be exactly 10 digits, found {}", npi.len()),
             "Ensure the NPI is exactly 10 digits without spaces or special characters".to_string())
        } else {
            ("NPI must contain only digits".to_string(),
             "Remove any non-numeric characters from the NPI".to_string())
        };

        Self::Validation {
            message,
            field: Some("number".to_string()),
            value: Some(npi.to_string()),
            suggestion: Some(suggestion),
        }
    }

    /// Create a validation error for an out-of-range limit
    pub fn invalid_limit(limit: u32, max: u32) -> Self {
        Self::Validation {
            message: format!("limit must be between 1 and {}, got {}", max, limit),
            field: Some("limit".to_string()),
            value: Some(limit.to_string()),
            suggestion: Some(format!(
                "The registry returns at most {} results per request; page with skip for more",
                max
            )),
        }
    }

    /// Create a validation error for an out-of-range skip
    pub fn invalid_skip(skip: u32, max: u32) -> Self {
        Self::Validation {
            message: format!("skip must be at most {}, got {}", max, skip),
            field: Some("skip".to_string()),
            value: Some(skip.to_string()),
            suggestion: None,
        }
    }

    /// Create a validation error for a malformed state code
    pub fn invalid_state(state: &str) -> Self {
        Self::Validation {
            message: format!("'{}' is not a two-letter state code", state),
            field: Some("state".to_string()),
            value: Some(state.to_string()),
            suggestion: Some("Use a USPS abbreviation such as NY or CA".to_string()),
        }
    }

    /// Create a validation error from the registry's `Errors` array
    pub fn from_api_errors(errors: &[ApiErrorDetail]) -> Self {
        let message = if errors.is_empty() {
            "Registry rejected the query".to_string()
        } else {
            errors.iter()
                .map(|e| e.description.as_deref().unwrap_or("unspecified error"))
                .collect::<Vec<_>>()
                .join("; ")
        };

        Self::Validation {
            message,
            field: errors.first().and_then(|e| e.field.clone()),
            value: None,
            suggestion: Some("Check the search criteria against the NPI Registry API documentation".to_string()),
        }
    }

    /// Create a request error for a non-success status
    pub fn http_status(status: u16, url: &str) -> Self {
        let suggestion = match status {
            400..=499 => "Check the request parameters",
            500..=599 => "The registry is having trouble; try again later",
            _ => "Check if the URL is correct and accessible",
        };

        Self::Request {
            message: format!("HTTP error {} from {}", status, url),
            url: Some(url.to_string()),
            status: Some(status),
            suggestion: Some(suggestion.to_string()),
        }
    }

    /// Whether this error is a validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Whether this error is a missing-provider result
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Request { suggestion: Some(sug), .. }
            | Self::Validation { suggestion: Some(sug), .. }
            | Self::Configuration { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            Self::NotFound { .. } => {
                format!("{}\n\nSuggestion: Verify the NPI at https://npiregistry.cms.hhs.gov/", self)
            }
            _ => self.to_string(),
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for NpiRegistryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<csv::Error> for NpiRegistryError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            line: err.position().map(|pos| pos.line()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for NpiRegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for NpiRegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode {
                message: err.to_string(),
            };
        }

        let suggestion = if err.is_timeout() {
            "The request timed out; raise timeout_seconds or try again"
        } else if err.is_connect() {
            "Check your internet connection and the configured base_url"
        } else {
            "Check the URL and your internet connection"
        };

        Self::Request {
            message: err.to_string(),
            url: err.url().map(|u| u.to_string()),
            status: err.status().map(|s| s.as_u16()),
            suggestion: Some(suggestion.to_string()),
        }
    }
}

impl From<config::ConfigError> for NpiRegistryError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
            suggestion: Some("Check the config file and NPI_REGISTRY_* environment variables".to_string()),
        }
    }
}
