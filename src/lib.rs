//! charge-alert - Stripe failed-charge email alerts
//!
//! Receives Stripe webhook events, picks out `charge.failed`, and emails a
//! formatted alert to a single recipient through the Gmail API. Recent
//! activity is kept in an in-memory ring buffer exposed over HTTP.
//!
//! # Architecture
//!
//! ```text
//! Stripe ──▶ POST /webhook ──▶ Notifier ──▶ MailTransport (Gmail)
//!                 │               │
//!                 ▼               ▼
//!           ┌───────────────────────────┐
//!           │        LogBuffer (50)      │ ◀── GET /logs
//!           └───────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use charge_alert::{AlertConfig, AppState, GmailTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AlertConfig::from_env(false)?;
//!     let credentials = config.gmail.clone().expect("credentials required");
//!     let transport = Arc::new(GmailTransport::new(credentials)?);
//!
//!     let state = Arc::new(AppState::new(transport, config.recipient.clone()));
//!     charge_alert::server::serve(charge_alert::server::router(state), "0.0.0.0:3000".parse()?).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod alert;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logbuf;
pub mod mail;
pub mod server;
pub mod stripe;

// Re-exports for convenience
pub use alert::{ChargeFailureEvent, NotificationResult, Notifier};
pub use config::AlertConfig;
pub use error::{Error, Result};
pub use logbuf::LogBuffer;
pub use mail::{DryRunTransport, GmailTransport, MailTransport};
pub use server::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
