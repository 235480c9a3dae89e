//! Error types for queue construction and system helpers.
//!
//! Observed full/empty are not errors: the non-blocking queue operations
//! report them as plain `false` and the retry policy belongs to the
//! caller. The only fatal condition is a bad construction parameter.

use thiserror::Error;

/// Result type alias for spanq operations
pub type Result<T> = std::result::Result<T, SpanqError>;

/// Main error type for the spanq library
#[derive(Error, Debug)]
pub enum SpanqError {
    /// Invalid construction parameter, e.g. a capacity that is zero or
    /// not a power of two
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message describing the configuration issue
        message: String,
    },

    /// OS-level resource errors, e.g. a failed CPU affinity request
    #[error("System resource error: {message}")]
    SystemResource {
        /// Error message describing the system resource issue
        message: String,
    },
}

impl SpanqError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new system resource error
    pub fn system_resource(message: impl Into<String>) -> Self {
        Self::SystemResource {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SpanqError::config("capacity must be a power of two");
        assert!(matches!(err, SpanqError::InvalidConfig { .. }));

        let err = SpanqError::system_resource("affinity mask rejected");
        assert!(matches!(err, SpanqError::SystemResource { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = SpanqError::config("bad capacity");
        assert_eq!(err.to_string(), "Invalid configuration: bad capacity");
    }
}
