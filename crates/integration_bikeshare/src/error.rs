//! Bike-sharing API error types

use thiserror::Error;

/// Errors that can occur while talking to an operator API
#[derive(Debug, Error)]
pub enum BikeshareError {
    /// Connection to the operator API failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request returned an unsuccessful status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the operator's response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The requested station does not exist
    #[error("Station not found: {0}")]
    StationNotFound(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl BikeshareError {
    /// Returns true if a later attempt could succeed
    ///
    /// The locator itself never retries; this is for callers that do.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(BikeshareError::ConnectionFailed("test".to_string()).is_transient());
        assert!(BikeshareError::RequestFailed("HTTP 503".to_string()).is_transient());
        assert!(BikeshareError::Timeout { timeout_secs: 10 }.is_transient());
    }

    #[test]
    fn test_permanent_errors() {
        assert!(!BikeshareError::ParseError("test".to_string()).is_transient());
        assert!(!BikeshareError::StationNotFound("42".to_string()).is_transient());
        assert!(!BikeshareError::ConfigurationError("test".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = BikeshareError::StationNotFound("42".to_string());
        assert_eq!(err.to_string(), "Station not found: 42");

        let err = BikeshareError::Timeout { timeout_secs: 10 };
        assert!(err.to_string().contains("10"));
    }
}
