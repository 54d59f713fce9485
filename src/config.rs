//! Service configuration loaded from the environment
//!
//! No secrets are hardcoded. Credentials come from environment variables
//! and are never logged.
//!
//! - `STRIPE_SECRET_KEY`: Stripe API key (optional, only checked for presence)
//! - `GMAIL_CLIENT_ID` / `GMAIL_CLIENT_SECRET`: OAuth client for the Gmail API
//! - `GMAIL_REFRESH_TOKEN`: long-lived refresh token of the sending account
//! - `ALERT_RECIPIENT`: address that receives every alert

use std::env;
use std::fmt;

use tracing::{info, warn};

use crate::error::{ConfigError, Result};

/// Recipient used when `ALERT_RECIPIENT` is not set
pub const DEFAULT_RECIPIENT: &str = "billing-alerts@example.com";

/// OAuth credentials for the Gmail send API
#[derive(Clone, PartialEq, Eq)]
pub struct GmailCredentials {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Refresh token for the authenticated sender ("me")
    pub refresh_token: String,
}

impl fmt::Debug for GmailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GmailCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Runtime configuration for the alerting service
#[derive(Clone)]
pub struct AlertConfig {
    /// Stripe secret key, if provided
    pub stripe_secret_key: Option<String>,
    /// Gmail credentials; `None` only in dry-run mode
    pub gmail: Option<GmailCredentials>,
    /// Address that receives alerts
    pub recipient: String,
}

impl fmt::Debug for AlertConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertConfig")
            .field(
                "stripe_secret_key",
                &self.stripe_secret_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gmail", &self.gmail)
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl AlertConfig {
    /// Load configuration from process environment variables.
    ///
    /// With `dry_run` set the Gmail credentials become optional.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) wrapping
    /// `ConfigError::MissingVar` when a Gmail variable is missing outside
    /// dry-run mode, or `ConfigError::InvalidVar` for a malformed recipient.
    pub fn from_env(dry_run: bool) -> Result<Self> {
        Ok(Self::from_lookup(|name| env::var(name).ok(), dry_run)?)
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F, dry_run: bool) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let stripe_secret_key = get("STRIPE_SECRET_KEY");
        if stripe_secret_key.is_none() {
            warn!("STRIPE_SECRET_KEY is not set");
        }

        let gmail = match (
            get("GMAIL_CLIENT_ID"),
            get("GMAIL_CLIENT_SECRET"),
            get("GMAIL_REFRESH_TOKEN"),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                Some(GmailCredentials {
                    client_id,
                    client_secret,
                    refresh_token,
                })
            }
            _ if dry_run => None,
            (None, _, _) => return Err(ConfigError::MissingVar("GMAIL_CLIENT_ID")),
            (_, None, _) => return Err(ConfigError::MissingVar("GMAIL_CLIENT_SECRET")),
            (_, _, None) => return Err(ConfigError::MissingVar("GMAIL_REFRESH_TOKEN")),
        };

        let recipient = get("ALERT_RECIPIENT").unwrap_or_else(|| DEFAULT_RECIPIENT.to_string());
        validate_recipient(&recipient)?;

        info!(recipient = %recipient, dry_run, "Alert configuration loaded");

        Ok(Self {
            stripe_secret_key,
            gmail,
            recipient,
        })
    }
}

fn validate_recipient(recipient: &str) -> std::result::Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidVar {
        name: "ALERT_RECIPIENT",
        reason: reason.to_string(),
    };

    if recipient.contains(['\r', '\n']) {
        return Err(invalid("must be a single line"));
    }
    match recipient.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(invalid("expected an email address")),
    }
}
