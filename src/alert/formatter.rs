//! Alert text rendering
//!
//! Pure mapping from a [`ChargeFailureEvent`] to the subject and body of the
//! alert email. Every input renders; there is no error path.

use chrono::DateTime;

use crate::alert::event::ChargeFailureEvent;

/// Rendered alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// Single-line subject
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// Render the alert for a failed charge
pub fn format(event: &ChargeFailureEvent) -> AlertMessage {
    let subject = format!("⚠️ Payment Failed - {}", event.customer());

    let body = format!(
        "A payment has failed on your Stripe account.\n\
         \n\
         Customer: {customer}\n\
         Amount: {amount} {currency}\n\
         Date: {date}\n\
         Reason: {reason}\n\
         Charge ID: {id}\n\
         \n\
         View in Stripe Dashboard: https://dashboard.stripe.com/payments/{id}\n",
        customer = event.customer(),
        amount = format_minor_units(event.amount()),
        currency = event.currency().to_uppercase(),
        date = format_timestamp(event.created()),
        reason = event.failure_reason(),
        id = event.id(),
    );

    AlertMessage { subject, body }
}

/// Render a minor-unit amount with exactly two decimals (`2500` -> `25.00`)
pub fn format_minor_units(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Render Unix seconds as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Out-of-range timestamps fall back to the raw number.
pub fn format_timestamp(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{secs} (unix)"),
    }
}
