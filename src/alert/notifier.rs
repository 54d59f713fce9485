//! Alert dispatch
//!
//! Formats a [`ChargeFailureEvent`], wraps it in a MIME envelope for the
//! configured recipient and hands it to a [`MailTransport`]. A single attempt
//! is made. Transport failures are logged and returned as
//! [`NotificationResult::Failed`], never as an error.

use std::sync::Arc;

use tracing::{info, warn};

use crate::alert::event::ChargeFailureEvent;
use crate::alert::formatter;
use crate::logbuf::LogBuffer;
use crate::mail::{Envelope, MailTransport};

/// Outcome of one notification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// The transport accepted the message
    Sent {
        /// Provider message ID, if any
        message_id: Option<String>,
    },
    /// The transport failed
    Failed {
        /// Transport error message
        reason: String,
    },
}

impl NotificationResult {
    /// Whether the message was handed off successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Sends failed-charge alerts to a fixed recipient
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    recipient: String,
    logs: Arc<LogBuffer>,
}

impl Notifier {
    /// Create a notifier
    pub fn new(
        transport: Arc<dyn MailTransport>,
        recipient: impl Into<String>,
        logs: Arc<LogBuffer>,
    ) -> Self {
        Self {
            transport,
            recipient: recipient.into(),
            logs,
        }
    }

    /// Address that receives every alert
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Format and send one alert
    pub async fn notify(&self, event: &ChargeFailureEvent) -> NotificationResult {
        let message = formatter::format(event);
        let envelope = Envelope::new(&self.recipient, &message.subject, &message.body);

        match self.transport.send(&envelope).await {
            Ok(sent) => {
                info!(
                    charge_id = %event.id(),
                    customer = %event.customer(),
                    message_id = ?sent.id,
                    "Alert email sent"
                );
                metrics::counter!("charge_alert_notifications_total", "outcome" => "sent")
                    .increment(1);
                self.logs.record(format!(
                    "Email sent for failed payment: {}",
                    event.customer()
                ));
                NotificationResult::Sent {
                    message_id: sent.id,
                }
            }
            Err(e) => {
                warn!(
                    charge_id = %event.id(),
                    error = %e,
                    "Alert email failed"
                );
                metrics::counter!("charge_alert_notifications_total", "outcome" => "failed")
                    .increment(1);
                self.logs.record(format!("Failed to send email: {e}"));
                NotificationResult::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
