//! Gmail REST transport
//!
//! Exchanges the long-lived refresh token for an access token, caches it
//! until shortly before expiry, and posts the encoded message to
//! `users/me/messages/send`.
//!
//! ```text
//! send() ──> cached token valid? ──no──> POST oauth2/token
//!                  │ yes                       │
//!                  ▼                           ▼
//!        POST gmail/v1/users/me/messages/send {raw}
//! ```

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::config::GmailCredentials;
use crate::error::MailError;
use crate::mail::{Envelope, MailTransport, SentMessage};

/// Google OAuth token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Gmail API base URL
pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com";

/// Tokens are refreshed this long before they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// HTTP timeout for both token and send requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
    grant_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    raw: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Gmail API transport authenticated as the refresh token's owner
pub struct GmailTransport {
    client: reqwest::Client,
    credentials: GmailCredentials,
    token_url: String,
    api_base: String,
    token: Mutex<Option<CachedToken>>,
}

impl GmailTransport {
    /// Create a transport against the public Google endpoints
    pub fn new(credentials: GmailCredentials) -> Result<Self, MailError> {
        Self::with_endpoints(credentials, DEFAULT_TOKEN_URL, DEFAULT_API_BASE)
    }

    /// Create a transport against custom endpoints
    pub fn with_endpoints(
        credentials: GmailCredentials,
        token_url: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            credentials,
            token_url: token_url.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    fn send_url(&self) -> String {
        format!("{}/gmail/v1/users/me/messages/send", self.api_base)
    }

    /// Return a valid access token, refreshing it if needed
    async fn access_token(&self) -> Result<String, MailError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Refreshing Gmail access token");
        let response = self
            .client
            .post(&self.token_url)
            .form(&TokenRequest {
                client_id: &self.credentials.client_id,
                client_secret: &self.credentials.client_secret,
                refresh_token: &self.credentials.refresh_token,
                grant_type: "refresh_token",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::TokenRefresh(format!(
                "{}: {}",
                status.as_u16(),
                error_message(&body)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| MailError::TokenRefresh(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }
}

#[async_trait]
impl MailTransport for GmailTransport {
    #[instrument(skip_all, fields(to = %envelope.to()))]
    async fn send(&self, envelope: &Envelope) -> Result<SentMessage, MailError> {
        let access_token = self.access_token().await?;
        let raw = envelope.encode_raw();

        let response = self
            .client
            .post(self.send_url())
            .bearer_auth(&access_token)
            .json(&SendRequest { raw: &raw })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                warn!("Gmail rejected the access token; it will be refreshed on the next send");
                self.invalidate_token().await;
            }
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let sent: SendResponse = response.json().await?;
        debug!(message_id = ?sent.id, "Gmail accepted message");
        Ok(SentMessage { id: sent.id })
    }
}

/// Pull a readable message out of a Google error body.
///
/// Handles both the OAuth shape (`error` + `error_description`) and the
/// API shape (`error.message`).
fn error_message(body: &str) -> String {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if body.trim().is_empty() => return "empty response".to_string(),
        Err(_) => return body.trim().to_string(),
    };

    if let Some(message) = parsed["error"]["message"].as_str() {
        return message.to_string();
    }
    match (
        parsed["error"].as_str(),
        parsed["error_description"].as_str(),
    ) {
        (Some(code), Some(description)) => format!("{code}: {description}"),
        (Some(code), None) => code.to_string(),
        _ => body.trim().to_string(),
    }
}
