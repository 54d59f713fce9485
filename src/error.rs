//! Error types for charge-alert
//!
//! This module provides the error hierarchy using `thiserror`. Component
//! errors stay local to the component that raises them. Mail and webhook
//! failures are turned into a [`NotificationResult`] or an HTTP response
//! inside the service; only startup failures surface as [`Error`].
//!
//! [`NotificationResult`]: crate::alert::NotificationResult

use thiserror::Error;

/// The main error type for charge-alert operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors (binding or serving the listener)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading configuration from the environment
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing or empty
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    /// A variable is present but unusable
    #[error("Invalid value for {name}: {reason}")]
    InvalidVar {
        /// Variable name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Errors raised by a mail transport
#[derive(Error, Debug)]
pub enum MailError {
    /// OAuth token refresh was rejected
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    /// The mail API answered with a non-success status
    #[error("Mail API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message returned by the API
        message: String,
    },

    /// Network or protocol failure talking to the mail API
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::Network(err.to_string())
    }
}

/// Errors raised while interpreting an inbound webhook payload
#[derive(Error, Debug)]
pub enum WebhookError {
    /// Body is not valid JSON or does not match the expected shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A field required for this event type is absent
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::InvalidPayload(err.to_string())
    }
}

/// Result type alias for charge-alert operations
pub type Result<T> = std::result::Result<T, Error>;
