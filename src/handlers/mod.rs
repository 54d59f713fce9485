//! HTTP handlers
//!
//! - [`status`]: `/`, `/health`, `/logs`, `/test`
//! - [`webhook`]: `/webhook`
//!
//! Every error leaves as JSON `{"error": "<message>"}`.

pub mod status;
pub mod webhook;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

pub use status::{health_handler, logs_handler, status_handler, test_handler};
pub use webhook::webhook_handler;

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable error message
    pub error: String,
}

/// Handler-level error mapped to an HTTP status
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be processed (400)
    #[error("{0}")]
    BadRequest(String),

    /// Unexpected failure inside the service (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
