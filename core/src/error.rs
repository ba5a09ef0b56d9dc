//! Error types for the identity quality client.
//!
//! # Design
//! Input problems and service problems are different failures for the
//! caller: the first means "fix your request", the second means "the service
//! or the network is in trouble". `Error` keeps them apart as two variants,
//! each wrapping its own enum, so callers can branch on the kind without
//! string matching.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Rejected caller input, detected locally before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No request author was supplied.
    #[error("request author is required")]
    MissingAuthor,

    /// The request author has an empty or whitespace-only name.
    #[error("request author name must not be blank")]
    BlankAuthorName,

    /// The author type text did not match a known type.
    #[error("unknown author type: {0}")]
    UnknownAuthorType(String),

    /// A required text field is empty or whitespace-only.
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },

    /// A required optional field is absent.
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// Both sides of an exclusion point at the same identity.
    #[error("identity_cuid_1 and identity_cuid_2 must be different (both are {0})")]
    IdenticalCuids(String),

    /// A duplicate search carried neither attributes nor rule codes.
    #[error("duplicate search needs at least one attribute or rule code")]
    EmptyDuplicateSearch,
}

/// Failures reported by the HTTP layer or while decoding its output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be delivered (DNS, connection refused, reset...).
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

/// Environment configuration that cannot produce a `ClientConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("{var} is not a valid number of seconds: {value}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Top-level error returned by client and service operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        let err = ValidationError::BlankField { field: "client_code" };
        assert_eq!(err.to_string(), "client_code must not be blank");

        let err = ValidationError::MissingField { field: "rule_code" };
        assert_eq!(err.to_string(), "rule_code is required");
    }

    #[test]
    fn kinds_are_distinguishable() {
        let validation: Error = ValidationError::MissingAuthor.into();
        assert!(validation.is_validation());
        assert!(!validation.is_transport());

        let transport: Error = TransportError::Status {
            status: 503,
            body: "down".to_string(),
        }
        .into();
        assert!(transport.is_transport());
        assert_eq!(transport.to_string(), "transport failure: HTTP 503: down");
    }

    #[test]
    fn config_messages_name_the_variable() {
        assert_eq!(ConfigError::Missing("IQ_URL").to_string(), "IQ_URL not set");
        let err = ConfigError::InvalidTimeout {
            var: "IQ_TIMEOUT",
            value: "soon".to_string(),
        };
        assert_eq!(err.to_string(), "IQ_TIMEOUT is not a valid number of seconds: soon");
    }
}
