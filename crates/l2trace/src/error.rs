//! Error types for trace operations.

use l2trace_device::DeviceError;
use thiserror::Error;

/// Result type alias for trace operations.
pub type TraceResult<T> = Result<T, TraceError>;

/// Errors that can occur while tracing a MAC address.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Connecting to or talking with a device failed.
    #[error("Device session error: {0}")]
    Session(#[from] DeviceError),

    /// Command output did not have the expected shape.
    #[error("No {what} found in output {output:?}")]
    NoMatch {
        /// What was being extracted (e.g., "learned port").
        what: &'static str,
        /// The output that was searched.
        output: String,
    },

    /// A port name has no alphabetic type prefix, so it cannot be compared
    /// against CDP interface names.
    #[error("Ambiguous port format: {0:?}")]
    AmbiguousPortFormat(String),

    /// Invalid configuration.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },
}

impl TraceError {
    /// Creates a no-match error.
    pub fn no_match(what: &'static str, output: impl Into<String>) -> Self {
        Self::NoMatch {
            what,
            output: output.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if the error comes from unexpected command output.
    ///
    /// Partial output is usually a sign that the delay factor is too small
    /// for the device.
    pub fn is_malformed_output(&self) -> bool {
        matches!(self, TraceError::NoMatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TraceError::no_match("learned port", "");
        assert_eq!(err.to_string(), "No learned port found in output \"\"");

        let err = TraceError::AmbiguousPortFormat("1/0/1".to_string());
        assert_eq!(err.to_string(), "Ambiguous port format: \"1/0/1\"");
    }

    #[test]
    fn test_classification() {
        let malformed = TraceError::no_match("member port", "Members in this channel:");
        assert!(malformed.is_malformed_output());

        let session = TraceError::from(DeviceError::internal("boom"));
        assert!(!session.is_malformed_output());

        let ambiguous = TraceError::AmbiguousPortFormat("0/1".to_string());
        assert!(!ambiguous.is_malformed_output());
    }
}
