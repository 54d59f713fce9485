//! Raw message construction for the Gmail send API
//!
//! Gmail accepts a complete RFC 2822 message encoded with the URL-safe
//! base64 alphabet. Padding is stripped.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

/// A plain-text message to a single recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    to: String,
    subject: String,
    body: String,
}

impl Envelope {
    /// Build an envelope.
    ///
    /// CR and LF in `to` and `subject` are replaced with spaces so they
    /// cannot open new header lines.
    pub fn new(to: &str, subject: &str, body: &str) -> Self {
        Self {
            to: single_line(to),
            subject: single_line(subject),
            body: body.to_string(),
        }
    }

    /// Recipient address
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Subject line, unencoded
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Render the message with CRLF line endings
    pub fn to_rfc2822(&self) -> String {
        let mut message = String::with_capacity(self.body.len() + 256);
        message.push_str(&format!("To: {}\r\n", self.to));
        message.push_str(&format!("Subject: {}\r\n", encode_header(&self.subject)));
        message.push_str("Content-Type: text/plain; charset=utf-8\r\n");
        message.push_str("MIME-Version: 1.0\r\n");
        message.push_str("\r\n");
        message.push_str(&normalize_newlines(&self.body));
        message
    }

    /// The `raw` field expected by `users.messages.send`
    pub fn encode_raw(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_rfc2822())
    }
}

/// RFC 2047 encoded-word for non-ASCII header values
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value))
    }
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

fn normalize_newlines(body: &str) -> String {
    body.replace("\r\n", "\n").replace('\n', "\r\n")
}
