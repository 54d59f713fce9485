//! Status and diagnostic handlers
//!
//! - `GET /` - service description and the monitored recipient
//! - `GET /health` - liveness with uptime
//! - `GET /logs` - recent activity from the log buffer
//! - `POST /test` - send an alert for a canned failed charge
//!
//! # Example Responses
//!
//! ```json
//! {"status": "healthy", "timestamp": "2026-01-01T12:00:00.000Z", "uptime": 3600.25}
//! ```
//!
//! ```json
//! {"logs": ["[2026-01-01T12:00:00.000Z] Webhook received: charge.failed"], "total": 1}
//! ```

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::alert::{ChargeFailureEvent, NotificationResult};
use crate::handlers::ApiError;
use crate::logbuf::LogEntry;
use crate::server::AppState;

/// Human readable service name
pub const SERVICE_NAME: &str = "Stripe Payment Failure Notifier";

/// Number of entries returned by `/logs`
pub const LOGS_PAGE_SIZE: usize = 20;

/// Endpoints advertised by `GET /`
pub const ENDPOINTS: [&str; 5] = [
    "GET / - service status",
    "GET /health - health check",
    "GET /logs - recent activity",
    "POST /test - send a test alert",
    "POST /webhook - Stripe webhook receiver",
];

// ============================================================================
// Response Types
// ============================================================================

/// `GET /` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always "active" if responding
    pub status: String,
    /// Service name
    pub service: String,
    /// Advertised endpoints
    pub endpoints: Vec<String>,
    /// Address receiving alerts
    pub monitoring: String,
}

/// `GET /health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" if responding
    pub status: String,
    /// RFC 3339 time of the check
    pub timestamp: String,
    /// Process uptime in seconds
    pub uptime: f64,
}

/// `GET /logs` response
#[derive(Debug, Clone, Serialize)]
pub struct LogsResponse {
    /// Most recent entries, oldest first
    pub logs: Vec<LogEntry>,
    /// Entries recorded since startup
    pub total: u64,
}

/// `POST /test` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResponse {
    /// Whether the alert was sent
    pub success: bool,
    /// Outcome description
    pub message: String,
}

// ============================================================================
// HTTP Handlers
// ============================================================================

/// Service status.
///
/// # Route
/// `GET /`
#[instrument(skip_all)]
pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Status requested");

    let response = StatusResponse {
        status: "active".to_string(),
        service: SERVICE_NAME.to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        monitoring: state.notifier().recipient().to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Liveness check.
///
/// # Route
/// `GET /health`
///
/// # Response
/// - `200 OK` - Always, if the server is running
#[instrument(skip_all)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Health check requested");

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.uptime().as_secs_f64(),
    };

    (StatusCode::OK, Json(response))
}

/// Recent activity log.
///
/// # Route
/// `GET /logs`
#[instrument(skip_all)]
pub async fn logs_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let logs = state.logs();
    let response = LogsResponse {
        logs: logs.recent(LOGS_PAGE_SIZE),
        total: logs.total(),
    };

    (StatusCode::OK, Json(response))
}

/// Send an alert for a canned failed charge.
///
/// The send runs in its own task so a panic inside the notification path
/// becomes a `500` instead of a dropped connection.
///
/// # Route
/// `POST /test`
///
/// # Response
/// - `200 OK` with `{success, message}` whether or not the send succeeded
/// - `500 Internal Server Error` if the notification task fails unexpectedly
#[instrument(skip_all)]
pub async fn test_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TestResponse>, ApiError> {
    state.logs().record("Test notification requested");

    let event = ChargeFailureEvent::sample();
    let notifier = state.notifier().clone();
    let result = tokio::spawn(async move { notifier.notify(&event).await })
        .await
        .map_err(|e| {
            error!(error = %e, "Test notification task failed");
            state.logs().record(format!("Test error: {e}"));
            ApiError::Internal(e.to_string())
        })?;

    let recipient = state.notifier().recipient();
    let message = match &result {
        NotificationResult::Sent { .. } => format!("Test email sent to {recipient}"),
        NotificationResult::Failed { reason } => {
            format!("Failed to send test email to {recipient}: {reason}")
        }
    };

    Ok(Json(TestResponse {
        success: result.is_success(),
        message,
    }))
}
