//! Failed-charge alerting
//!
//! ```text
//! Charge ──> ChargeFailureEvent ──> formatter ──> Envelope ──> MailTransport
//!                                                                  │
//!                                                     NotificationResult + log
//! ```

pub mod event;
pub mod formatter;
pub mod notifier;

pub use event::{first_present, ChargeFailureEvent, UNKNOWN_CUSTOMER, UNSPECIFIED_REASON};
pub use formatter::{format, AlertMessage};
pub use notifier::{NotificationResult, Notifier};
