//! Outbound mail
//!
//! [`MailTransport`] abstracts the send call so the notifier can run against
//! Gmail in production and against a fake in tests.
//!
//! - [`GmailTransport`]: OAuth refresh-token flow + `users.messages.send`
//! - [`DryRunTransport`]: logs the message and reports success

pub mod gmail;
pub mod mime;

use async_trait::async_trait;
use tracing::info;

use crate::error::MailError;

pub use gmail::GmailTransport;
pub use mime::Envelope;

/// Receipt for a delivered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Provider message ID, when the provider returns one
    pub id: Option<String>,
}

/// Sends a fully built message
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Send one message. No retries are attempted.
    async fn send(&self, envelope: &Envelope) -> Result<SentMessage, MailError>;
}

/// Transport that only logs what it would send
#[derive(Debug, Clone, Default)]
pub struct DryRunTransport;

#[async_trait]
impl MailTransport for DryRunTransport {
    async fn send(&self, envelope: &Envelope) -> Result<SentMessage, MailError> {
        info!(
            to = %envelope.to(),
            subject = %envelope.subject(),
            raw_len = envelope.encode_raw().len(),
            "Dry run: email not sent"
        );
        Ok(SentMessage { id: None })
    }
}
