//! Stripe Event Types
//!
//! The webhook envelope stays untyped JSON; the charge object it carries
//! gets a typed view. Only the charge fields needed to build an alert are
//! required, everything else is optional.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WebhookError;

/// Stripe event types we distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripeEventType {
    /// `charge.failed`
    ChargeFailed,
    /// Anything else; acknowledged and ignored
    Other,
}

impl StripeEventType {
    /// Classify a raw `type` string
    pub fn parse(s: &str) -> Self {
        match s {
            "charge.failed" => Self::ChargeFailed,
            _ => Self::Other,
        }
    }

    /// Whether events of this type trigger an alert
    pub fn triggers_alert(&self) -> bool {
        matches!(self, Self::ChargeFailed)
    }
}

/// Webhook envelope as posted by Stripe.
///
/// The envelope is kept as raw JSON. Only `type` is looked at for every
/// event, and `data.object` is read only once the type asks for it, so
/// unexpected shapes elsewhere in the payload never reject an event.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    raw: Value,
}

impl WebhookEvent {
    /// Parse from raw JSON bytes; any JSON value is accepted
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WebhookError> {
        Ok(Self {
            raw: serde_json::from_slice(bytes)?,
        })
    }

    /// Declared event type, if `type` is present and a string
    pub fn event_type(&self) -> Option<&str> {
        self.raw.get("type").and_then(Value::as_str)
    }

    /// Typed event type; a missing `type` is treated as an ignored event
    pub fn typed_event_type(&self) -> StripeEventType {
        self.event_type()
            .map(StripeEventType::parse)
            .unwrap_or(StripeEventType::Other)
    }

    /// Extract the charge carried in `data.object`
    pub fn charge(&self) -> Result<Charge, WebhookError> {
        let object = self
            .raw
            .pointer("/data/object")
            .filter(|object| !object.is_null())
            .ok_or(WebhookError::MissingField("data.object"))?;

        Ok(Charge::deserialize(object)?)
    }
}

/// Stripe charge object, restricted to the fields used for alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    /// Charge ID (ch_...)
    pub id: String,
    /// Amount in the currency's minor unit
    pub amount: i64,
    /// Three-letter ISO currency code, lowercase as sent by Stripe
    pub currency: String,
    /// Creation time (Unix timestamp)
    pub created: i64,
    /// Customer the charge belongs to, if any
    #[serde(default)]
    pub customer: Option<CustomerRef>,
    /// Billing details collected with the payment method
    #[serde(default)]
    pub billing_details: Option<BillingDetails>,
    /// Processor failure message
    #[serde(default)]
    pub failure_message: Option<String>,
    /// Risk and network outcome
    #[serde(default)]
    pub outcome: Option<Outcome>,
}

/// A customer field is either an ID or an expanded customer object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerRef {
    /// Plain `cus_...` ID
    Id(String),
    /// Expanded customer object
    Expanded {
        /// Customer ID
        id: String,
    },
}

impl CustomerRef {
    /// The customer ID regardless of representation
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Expanded { id } => id,
        }
    }
}

/// Billing details on a charge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingDetails {
    /// Billing email
    #[serde(default)]
    pub email: Option<String>,
    /// Billing name
    #[serde(default)]
    pub name: Option<String>,
}

/// Charge outcome details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outcome {
    /// Human readable description of the outcome for the seller
    #[serde(default)]
    pub seller_message: Option<String>,
}
