//! Error types for rankscope-core.
//!
//! This module defines the errors raised by the service clients and by
//! configuration loading. The dashboard never lets these escape to the UI:
//! they are converted into user-facing messages at the point of the
//! asynchronous operation (see [`crate::dashboard`]).

use thiserror::Error;

/// Errors that can occur while talking to the recommender backend or the catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout)
    #[error("Request failed: {0}")]
    Transport(String),
    /// The service answered with a non-success status code
    #[error("Unexpected status: {0}")]
    Status(u16),
    /// The response body could not be decoded into the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
    /// A request URL could not be built from the configured base
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// True when the service was reachable but reported a non-success status.
    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::Status(_))
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
    /// A configured base URL is not a valid http(s) URL
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<ApiError> for String {
    fn from(err: ApiError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ApiError::Status(404).is_status());
        assert!(!ApiError::Transport("refused".into()).is_status());
        assert!(!ApiError::Decode("eof".into()).is_status());
    }

    #[test]
    fn test_json_error_converts_to_decode() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(matches!(ApiError::from(err), ApiError::Decode(_)));
    }
}
