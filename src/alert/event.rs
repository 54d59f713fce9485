//! Charge failures as alert inputs
//!
//! A [`ChargeFailureEvent`] is resolved once from a Stripe charge. Every
//! optional field collapses to a concrete string through [`first_present`],
//! so formatting never has to deal with absent values.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::stripe::events::{BillingDetails, Charge, CustomerRef};

/// Customer label when no identifying field is present
pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

/// Failure reason when the processor gives none
pub const UNSPECIFIED_REASON: &str = "Not specified";

static SAMPLE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Return the first candidate that is present and not blank.
///
/// Candidates are checked in order; surrounding whitespace is not trimmed
/// from the returned value.
pub fn first_present<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

/// One failed charge to alert about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeFailureEvent {
    id: String,
    amount: i64,
    currency: String,
    created: i64,
    customer: String,
    failure_reason: String,
}

impl ChargeFailureEvent {
    /// Resolve an alert from a Stripe charge.
    ///
    /// Customer precedence: billing email, customer ID, billing name.
    /// Reason precedence: outcome seller message, failure message.
    pub fn from_charge(charge: &Charge) -> Self {
        let billing = charge.billing_details.as_ref();
        let customer = first_present([
            billing.and_then(|b| b.email.as_deref()),
            charge.customer.as_ref().map(CustomerRef::id),
            billing.and_then(|b| b.name.as_deref()),
        ])
        .unwrap_or(UNKNOWN_CUSTOMER);

        let failure_reason = first_present([
            charge
                .outcome
                .as_ref()
                .and_then(|o| o.seller_message.as_deref()),
            charge.failure_message.as_deref(),
        ])
        .unwrap_or(UNSPECIFIED_REASON);

        Self {
            id: charge.id.clone(),
            amount: charge.amount,
            currency: charge.currency.clone(),
            created: charge.created,
            customer: customer.to_string(),
            failure_reason: failure_reason.to_string(),
        }
    }

    /// Canned failure used by the manual test trigger.
    ///
    /// The ID is `ch_test_<millis>_<seq>`, where `seq` counts samples made by
    /// this process, so triggers within the same millisecond stay distinct.
    pub fn sample() -> Self {
        let now = Utc::now();
        let seq = SAMPLE_SEQ.fetch_add(1, Ordering::Relaxed);
        let charge = Charge {
            id: format!("ch_test_{}_{seq}", now.timestamp_millis()),
            amount: 2500,
            currency: "usd".to_string(),
            created: now.timestamp(),
            customer: None,
            billing_details: Some(BillingDetails {
                email: Some("test@example.com".to_string()),
                name: Some("Test Customer".to_string()),
            }),
            failure_message: Some("Your card was declined.".to_string()),
            outcome: None,
        };
        Self::from_charge(&charge)
    }

    /// Charge ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Amount in minor units
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Currency code as received
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Creation time (Unix seconds)
    pub fn created(&self) -> i64 {
        self.created
    }

    /// Resolved customer label
    pub fn customer(&self) -> &str {
        &self.customer
    }

    /// Resolved failure reason
    pub fn failure_reason(&self) -> &str {
        &self.failure_reason
    }
}
