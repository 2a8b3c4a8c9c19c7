//! Error handling for WHOIS and DNS lookup operations.
//!
//! This module defines a single error type that covers every way a lookup
//! can fail, from malformed input to transport failures and expired deadlines.

use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Main error type for lookup operations.
///
/// Each variant maps to one failure class a caller may want to react to
/// differently: bad input fails before any network activity, transport and
/// timeout failures come from the wire, configuration errors come from files.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Domain name is malformed (e.g. fewer than two labels)
    InvalidDomain { domain: String, reason: String },

    /// Connection, write or read failure talking to a server
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// Connect or read exceeded the configured deadline
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// A DNS resolver reported a failure
    DnsError { name: String, message: String },

    /// Configuration errors (invalid settings, etc.)
    ConfigError { message: String },

    /// Configuration file could not be read
    FileError { path: String, message: String },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl LookupError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new DNS resolver error.
    pub fn dns<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Self::DnsError {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True when the operation ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// True when the caller supplied unusable input; retrying cannot help.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidDomain { .. } | Self::ConfigError { .. })
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::DnsError { name, message } => {
                write!(f, "DNS error for '{}': {}", name, message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for LookupError {}

// Errors travel inside serialized results as their display text.
impl Serialize for LookupError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<std::io::Error> for LookupError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization failed: {}", err),
        }
    }
}

impl From<toml::de::Error> for LookupError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = LookupError::invalid_domain("invalid", "Domain must contain at least one dot");
        assert_eq!(
            err.to_string(),
            "Invalid domain 'invalid': Domain must contain at least one dot"
        );

        let err = LookupError::network_with_source("failed to connect", "connection refused");
        assert_eq!(
            err.to_string(),
            "Network error: failed to connect (source: connection refused)"
        );

        let err = LookupError::timeout("WHOIS query", Duration::from_secs(2));
        assert_eq!(err.to_string(), "Timeout after 2s during: WHOIS query");
    }

    #[test]
    fn test_classification() {
        assert!(LookupError::timeout("connect", Duration::from_secs(1)).is_timeout());
        assert!(!LookupError::network("boom").is_timeout());
        assert!(LookupError::invalid_domain("x", "bad").is_invalid_input());
        assert!(!LookupError::network("boom").is_invalid_input());
    }

    #[test]
    fn test_serializes_as_display_string() {
        let err = LookupError::network("refused");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Network error: refused\"");
    }
}
