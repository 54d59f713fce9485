//! Stripe webhook receiver
//!
//! One event per request. `charge.failed` events trigger an alert, every
//! other type is logged and acknowledged.
//!
//! ```text
//! body ──> parse ──> log type ──> charge.failed? ──yes──> notify
//!            │                         │                    │
//!            ▼                         no                   ▼
//!           400 ◀── not JSON /         └────────────> 200 {received: true}
//!               bad charge.failed object
//! ```
//!
//! Only `type` is inspected for every event; `data.object` is checked only
//! for `charge.failed`.
//!
//! The acknowledgement never depends on the notification outcome.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::alert::ChargeFailureEvent;
use crate::error::WebhookError;
use crate::handlers::ApiError;
use crate::server::AppState;
use crate::stripe::WebhookEvent;

/// Acknowledgement returned for every processed webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    /// Always true
    pub received: bool,
}

/// Receive a Stripe event.
///
/// # Route
/// `POST /webhook`
///
/// # Response
/// - `200 OK` `{"received": true}` once the event is handled
/// - `400 Bad Request` `{"error": ...}` if the payload cannot be processed
#[instrument(skip_all, fields(body_len = body.len()))]
pub async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    match process_event(&state, &body).await {
        Ok(()) => Ok(Json(WebhookAck { received: true })),
        Err(e) => {
            warn!(error = %e, "Rejected webhook payload");
            state.logs().record(format!("Webhook error: {e}"));
            Err(ApiError::BadRequest(e.to_string()))
        }
    }
}

async fn process_event(state: &AppState, body: &[u8]) -> Result<(), WebhookError> {
    let event = WebhookEvent::from_bytes(body)?;

    state.logs().record(format!(
        "Webhook received: {}",
        event.event_type().unwrap_or("<none>")
    ));

    if event.typed_event_type().triggers_alert() {
        let charge = event.charge()?;
        let alert = ChargeFailureEvent::from_charge(&charge);
        // Outcome is logged by the notifier; the ack is unconditional.
        let _ = state.notifier().notify(&alert).await;
    }

    Ok(())
}
