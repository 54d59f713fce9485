//! Stripe webhook payloads
//!
//! Only the envelope and the charge object are modelled. Inbound events are
//! not signature-checked; the webhook route accepts any well-formed body.
//!
//! ```text
//! {"type": "charge.failed", "data": {"object": <Charge>}}
//! ```

pub mod events;

pub use events::{BillingDetails, Charge, CustomerRef, Outcome, StripeEventType, WebhookEvent};
