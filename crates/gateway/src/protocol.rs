//! Wire shapes for the method boundary.
//!
//! Only the RPC surface lives here: the error shape every handler returns and
//! the response envelope a transport would serialize. No transport is mounted
//! in this crate; a server embeds the registry and speaks whatever framing it
//! likes.

use serde::{Deserialize, Serialize};

// ── Error codes ──────────────────────────────────────────────────────────────

pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";
    pub const UNAVAILABLE: &str = "UNAVAILABLE";
}

// ── Error shape ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorShape {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    #[serde(rename = "retryAfterMs", skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
}

impl ErrorShape {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: None,
            retry_after_ms: None,
        }
    }
}

// ── Response envelope ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFrame {
    pub id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorShape>,
}

impl ResponseFrame {
    pub fn ok(id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            ok: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn err(id: impl Into<String>, error: ErrorShape) -> Self {
        Self {
            id: id.into(),
            ok: false,
            payload: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_shape_serializes_without_empty_fields() {
        let err = ErrorShape::new(error_codes::INVALID_REQUEST, "bad params");
        let json = serde_json::to_value(&err).unwrap_or_default();
        assert_eq!(json["code"], "INVALID_REQUEST");
        assert!(json.get("details").is_none());
        assert!(json.get("retryAfterMs").is_none());
    }

    #[test]
    fn response_frames_carry_payload_xor_error() {
        let ok = ResponseFrame::ok("1", serde_json::json!({ "n": 1 }));
        assert!(ok.ok);
        assert!(ok.error.is_none());

        let err = ResponseFrame::err("2", ErrorShape::new(error_codes::UNAVAILABLE, "down"));
        assert!(!err.ok);
        assert!(err.payload.is_none());
    }
}
