//! HTTP server wiring
//!
//! Builds the shared [`AppState`], the axum [`Router`] and runs it until
//! Ctrl-C or SIGTERM.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use charge_alert::mail::DryRunTransport;
//! use charge_alert::server::{router, serve, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let state = Arc::new(AppState::new(Arc::new(DryRunTransport), "ops@example.com"));
//!     serve(router(state), "127.0.0.1:3000".parse()?).await?;
//!     Ok(())
//! }
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::alert::Notifier;
use crate::handlers::{health_handler, logs_handler, status_handler, test_handler, webhook_handler};
use crate::logbuf::LogBuffer;
use crate::mail::MailTransport;

/// Shared state handed to every handler
pub struct AppState {
    /// Server start time for uptime calculation
    start_time: Instant,
    logs: Arc<LogBuffer>,
    notifier: Arc<Notifier>,
}

impl AppState {
    /// Create state with a fresh log buffer
    pub fn new(transport: Arc<dyn MailTransport>, recipient: impl Into<String>) -> Self {
        Self::with_logs(transport, recipient, Arc::new(LogBuffer::new()))
    }

    /// Create state around an existing log buffer
    pub fn with_logs(
        transport: Arc<dyn MailTransport>,
        recipient: impl Into<String>,
        logs: Arc<LogBuffer>,
    ) -> Self {
        let notifier = Arc::new(Notifier::new(transport, recipient, logs.clone()));
        Self {
            start_time: Instant::now(),
            logs,
            notifier,
        }
    }

    /// Time since the state was created
    #[inline]
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Activity log
    #[inline]
    pub fn logs(&self) -> &Arc<LogBuffer> {
        &self.logs
    }

    /// Alert notifier
    #[inline]
    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }
}

/// Create the router with all service endpoints.
///
/// # Routes
/// - `GET /` - service status
/// - `GET /health` - liveness
/// - `GET /logs` - recent activity
/// - `POST /test` - manual alert
/// - `POST /webhook` - Stripe events
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(status_handler))
        .route("/health", get(health_handler))
        .route("/logs", get(logs_handler))
        .route("/test", post(test_handler))
        .route("/webhook", post(webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve `app` until a shutdown signal arrives
pub async fn serve(app: Router, addr: SocketAddr) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::DryRunTransport;

    #[test]
    fn test_state_shares_log_buffer() {
        let logs = Arc::new(LogBuffer::new());
        let state = AppState::with_logs(Arc::new(DryRunTransport), "ops@example.com", logs.clone());

        logs.record("shared");
        assert_eq!(state.logs().total(), 1);
        assert_eq!(state.notifier().recipient(), "ops@example.com");
        assert!(state.uptime() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_serve_reports_bind_failure() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();
        let state = Arc::new(AppState::new(Arc::new(DryRunTransport), "ops@example.com"));

        let err = serve(router(state), addr).await.unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
