//! Shared helpers for router-level tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use charge_alert::error::MailError;
use charge_alert::mail::{Envelope, MailTransport, SentMessage};
use charge_alert::server::{router, AppState};
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;

pub const RECIPIENT: &str = "alerts@shop.test";

/// Transport that counts attempts and can be switched to fail or panic
#[derive(Default)]
pub struct CountingTransport {
    attempts: AtomicU32,
    fail: AtomicBool,
    panic: AtomicBool,
    envelopes: Mutex<Vec<Envelope>>,
}

impl CountingTransport {
    pub fn failing() -> Self {
        let transport = Self::default();
        transport.fail.store(true, Ordering::SeqCst);
        transport
    }

    /// Panics inside `send`, after counting the attempt
    pub fn panicking() -> Self {
        let transport = Self::default();
        transport.panic.store(true, Ordering::SeqCst);
        transport
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn envelopes(&self) -> Vec<Envelope> {
        self.envelopes.lock().clone()
    }
}

#[async_trait]
impl MailTransport for CountingTransport {
    async fn send(&self, envelope: &Envelope) -> Result<SentMessage, MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.envelopes.lock().push(envelope.clone());
        if self.panic.load(Ordering::SeqCst) {
            panic!("mail transport exploded");
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Api {
                status: 403,
                message: "Daily sending quota exceeded".to_string(),
            });
        }
        Ok(SentMessage {
            id: Some("gmail-msg-1".to_string()),
        })
    }
}

pub struct TestApp {
    pub app: Router,
    pub state: Arc<AppState>,
    pub transport: Arc<CountingTransport>,
}

impl TestApp {
    pub fn new(transport: CountingTransport) -> Self {
        let transport = Arc::new(transport);
        let state = Arc::new(AppState::new(transport.clone(), RECIPIENT));
        Self {
            app: router(state.clone()),
            state,
            transport,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post(&self, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("failed to make request");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let json = serde_json::from_slice(&bytes).expect("response should be valid JSON");
        (status, json)
    }
}

pub fn charge_failed_payload() -> Value {
    serde_json::json!({
        "id": "evt_3OabcFailed",
        "object": "event",
        "type": "charge.failed",
        "data": {
            "object": {
                "id": "ch_3OabcFailed",
                "object": "charge",
                "amount": 2500,
                "currency": "usd",
                "created": 1700000000,
                "customer": "cus_Pabc",
                "billing_details": {"email": "buyer@example.com", "name": "Buyer"},
                "failure_message": "Your card was declined.",
                "outcome": {"seller_message": "The bank did not return any further details with this decline."}
            }
        }
    })
}
