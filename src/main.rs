//! charge-alert server
//!
//! Listens for Stripe webhooks and emails an alert for each failed charge.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use charge_alert::mail::{DryRunTransport, GmailTransport, MailTransport};
use charge_alert::server::{router, serve, AppState};
use charge_alert::AlertConfig;

/// Stripe failed-charge notifier
#[derive(Parser, Debug)]
#[command(name = "charge-alert")]
#[command(version)]
#[command(about = "Email an alert for every failed Stripe charge")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log alerts instead of sending them
    #[arg(long, env = "CHARGE_ALERT_DRY_RUN")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose
    let default_filter = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AlertConfig::from_env(args.dry_run).context("loading configuration")?;

    let transport: Arc<dyn MailTransport> = match (&config.gmail, args.dry_run) {
        (Some(credentials), false) => Arc::new(
            GmailTransport::new(credentials.clone()).context("building Gmail client")?,
        ),
        _ => {
            tracing::warn!("Dry-run mode: alerts are logged, not emailed");
            Arc::new(DryRunTransport)
        }
    };

    let state = Arc::new(AppState::new(transport, config.recipient.clone()));
    state
        .logs()
        .record(format!("Server starting on port {}", args.port));

    tracing::info!(
        version = charge_alert::VERSION,
        recipient = %config.recipient,
        "charge-alert starting on {}:{}",
        args.host,
        args.port
    );

    serve(router(state), SocketAddr::new(args.host, args.port))
        .await
        .context("server error")?;

    tracing::info!("charge-alert stopped");
    Ok(())
}
