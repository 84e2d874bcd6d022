//! Error types for the payment facade client
//!
//! Every fallible operation in this crate returns [`Result`], whose error type
//! is [`PaymentClientError`]. Construction problems, authentication problems and
//! downstream HTTP failures each have their own variant so callers can branch on
//! them without parsing messages.

use http::StatusCode;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, PaymentClientError>;

/// Errors produced by the authenticated client and the services built on it
#[derive(Debug, Error)]
pub enum PaymentClientError {
    /// A mandatory configuration value was absent or blank
    #[error("missing required configuration value: {field}")]
    MissingConfiguration { field: &'static str },

    /// Configuration was present but unusable
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The feature-flag capability could not answer
    #[error("feature flag check failed for '{flag}': {message}")]
    FeatureFlag { flag: String, message: String },

    /// A token could not be obtained from the identity provider
    #[error("token acquisition failed: {message}")]
    TokenAcquisition { message: String },

    /// Token acquisition failed or returned nothing while authentication was enabled
    #[error("failed to prepare authenticated client: {message}")]
    AuthenticationPreparation {
        message: String,
        #[source]
        source: Option<Box<PaymentClientError>>,
    },

    /// A mutating verb was called without a relative path
    #[error("invalid request path: {message}")]
    InvalidPath { message: String },

    /// The downstream service answered a typed call with a non-success status
    #[error("request failed with status {status}: {message}")]
    ResponseCode { status: StatusCode, message: String },

    /// The downstream service answered a fire-and-forget call with a non-success status
    #[error("{0}")]
    ApiCall(String),

    /// The request payload could not be encoded as JSON
    #[error("failed to serialize request payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response body could not be converted to the requested type
    #[error("failed to deserialize response: {message}")]
    Deserialization { message: String },

    /// A request argument was rejected before any I/O
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Connection, timeout or protocol failure reported by the transport
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,
}

impl PaymentClientError {
    /// Create a missing-configuration error naming the field
    pub fn missing(field: &'static str) -> Self {
        Self::MissingConfiguration { field }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a feature-flag error
    pub fn feature_flag(flag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FeatureFlag {
            flag: flag.into(),
            message: message.into(),
        }
    }

    /// Create a token acquisition error
    pub fn token_acquisition(message: impl Into<String>) -> Self {
        Self::TokenAcquisition {
            message: message.into(),
        }
    }

    /// Wrap a failure that happened while preparing authentication
    pub fn authentication(message: impl Into<String>, source: Option<PaymentClientError>) -> Self {
        Self::AuthenticationPreparation {
            message: message.into(),
            source: source.map(Box::new),
        }
    }

    /// Create a path validation error
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath {
            message: message.into(),
        }
    }

    /// Create a response-code error
    pub fn response_code(status: StatusCode, message: impl Into<String>) -> Self {
        Self::ResponseCode {
            status,
            message: message.into(),
        }
    }

    /// Create a deserialization error
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status carried by a response-code error
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::ResponseCode { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Whether the error was raised while preparing authentication
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, Self::AuthenticationPreparation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_missing_configuration_names_field() {
        let err = PaymentClientError::missing("base_url");
        assert_eq!(
            err.to_string(),
            "missing required configuration value: base_url"
        );
    }

    #[test]
    fn test_authentication_error_keeps_cause() {
        let cause = PaymentClientError::token_acquisition("identity provider down");
        let err = PaymentClientError::authentication("token request failed", Some(cause));

        assert!(err.is_authentication_error());
        assert!(err
            .to_string()
            .starts_with("failed to prepare authenticated client"));
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("identity provider down"));
    }

    #[test]
    fn test_status_code_only_for_response_errors() {
        let err = PaymentClientError::response_code(StatusCode::NOT_FOUND, "missing");
        assert_eq!(err.status_code(), Some(StatusCode::NOT_FOUND));

        let err = PaymentClientError::ApiCall("boom".to_string());
        assert_eq!(err.status_code(), None);
        assert_eq!(err.to_string(), "boom");
    }
}
