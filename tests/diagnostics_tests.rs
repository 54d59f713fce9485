//! Status, health, logs and manual-test endpoint tests.

mod common;

use axum::http::StatusCode;
use common::{CountingTransport, TestApp, RECIPIENT};
use serde_json::json;

#[tokio::test]
async fn status_describes_service() {
    let app = TestApp::new(CountingTransport::default());

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["service"], "Stripe Payment Failure Notifier");
    assert_eq!(body["monitoring"], RECIPIENT);

    let endpoints = body["endpoints"].as_array().expect("endpoints should be an array");
    assert!(endpoints
        .iter()
        .any(|e| e.as_str().unwrap().contains("POST /webhook")));
}

#[tokio::test]
async fn health_reports_timestamp_and_uptime() {
    let app = TestApp::new(CountingTransport::default());

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn logs_returns_last_twenty_and_running_total() {
    let app = TestApp::new(CountingTransport::default());
    for i in 0..60 {
        app.state.logs().record(format!("entry {i}"));
    }

    let (status, body) = app.get("/logs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 60);

    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 20);
    assert!(logs[0].as_str().unwrap().ends_with("entry 40"));
    assert!(logs[19].as_str().unwrap().ends_with("entry 59"));
}

#[tokio::test]
async fn logs_total_grows_with_activity() {
    let app = TestApp::new(CountingTransport::default());

    let (_, before) = app.get("/logs").await;
    app.post("/webhook", json!({"type": "ping"}).to_string()).await;
    let (_, after) = app.get("/logs").await;

    assert_eq!(before["total"], 0);
    assert_eq!(after["total"], 1);
}

#[tokio::test]
async fn test_trigger_reports_success() {
    let app = TestApp::new(CountingTransport::default());

    let (status, body) = app.post("/test", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], format!("Test email sent to {RECIPIENT}"));
    assert_eq!(app.transport.attempts(), 1);

    let envelope = &app.transport.envelopes()[0];
    assert_eq!(envelope.subject(), "⚠️ Payment Failed - test@example.com");
    let raw = envelope.to_rfc2822();
    assert!(raw.contains("Amount: 25.00 USD"));
    assert!(raw.contains("Reason: Your card was declined."));
    assert!(raw.contains("Charge ID: ch_test_"));
}

#[tokio::test]
async fn test_trigger_reports_failure() {
    let app = TestApp::new(CountingTransport::failing());

    let (status, body) = app.post("/test", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to send test email"));
    assert!(message.contains(RECIPIENT));
    assert_eq!(app.transport.attempts(), 1);
}

#[tokio::test]
async fn test_trigger_ids_are_unique() {
    let app = TestApp::new(CountingTransport::default());

    app.post("/test", "").await;
    app.post("/test", "").await;

    let ids: Vec<String> = app
        .transport
        .envelopes()
        .iter()
        .map(|e| {
            e.to_rfc2822()
                .lines()
                .find(|l| l.starts_with("Charge ID: "))
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_trigger_panic_is_internal_error_and_server_keeps_serving() {
    let app = TestApp::new(CountingTransport::panicking());

    let (status, body) = app.post("/test", "").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().expect("error should be a string");
    assert!(!error.is_empty());
    assert_eq!(app.transport.attempts(), 1);

    let logs = app.state.logs().recent(5);
    assert!(logs.iter().any(|e| e.as_str().contains("Test error: ")));

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
