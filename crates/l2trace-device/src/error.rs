//! Error types for device session and output parsing.
//!
//! All errors implement `std::error::Error` via `thiserror`.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Result type alias for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors raised at the device-session boundary.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// TCP connection to the device could not be established.
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        /// The device address.
        address: SocketAddr,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// SSH protocol failure (handshake, channel, timeout).
    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),

    /// The device rejected the supplied credentials.
    #[error("Authentication failed for user '{username}' on {host}")]
    Authentication {
        /// The device address.
        host: String,
        /// The user name that was rejected.
        username: String,
    },

    /// Reading command output failed.
    #[error("Failed to read output of '{command}': {source}")]
    Read {
        /// The command whose output was being read.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The session was used after being closed.
    #[error("Session to {host} is closed")]
    Closed {
        /// The device address.
        host: String,
    },

    /// No output template exists for a platform/command pair.
    #[error("No template for '{command}' on {platform}")]
    TemplateNotFound {
        /// Platform name (e.g., "cisco_ios").
        platform: String,
        /// The command.
        command: String,
    },

    /// A template file could not be loaded or compiled.
    #[error("Invalid template {source_name}: {message}")]
    Template {
        /// File name or built-in template name.
        source_name: String,
        /// Error message.
        message: String,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl DeviceError {
    /// Creates a template error.
    pub fn template(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error is caused by the network or the device
    /// rather than by local configuration.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DeviceError::Connect { .. } | DeviceError::Ssh(_) | DeviceError::Read { .. }
        )
    }
}

impl From<tokio::task::JoinError> for DeviceError {
    fn from(err: tokio::task::JoinError) -> Self {
        DeviceError::internal(format!("blocking session task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeviceError::Authentication {
            host: "10.0.0.1".to_string(),
            username: "netops".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Authentication failed for user 'netops' on 10.0.0.1"
        );
    }

    #[test]
    fn test_template_not_found() {
        let err = DeviceError::TemplateNotFound {
            platform: "cisco_ios".to_string(),
            command: "show version".to_string(),
        };
        assert!(err.to_string().contains("show version"));
        assert!(err.to_string().contains("cisco_ios"));
    }

    #[test]
    fn test_is_transient() {
        let connect = DeviceError::Connect {
            address: "10.0.0.1:22".parse().unwrap(),
            source: io::Error::new(io::ErrorKind::TimedOut, "timed out"),
        };
        assert!(connect.is_transient());
        assert!(!DeviceError::internal("bug").is_transient());
        assert!(!DeviceError::template("x.yaml", "bad regex").is_transient());
    }
}
