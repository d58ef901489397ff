//! Response envelope parsing
//!
//! Server replies arrive in one of two envelopes: the message-oriented shape
//! carries `status`, `result`, `id`, and `type` at the top level; the HTTP
//! shape nests `status` inside `result`. Both parse into one read-only
//! `Response` value.

use crate::{ModelError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request was processed
    Success,
    /// The request was rejected
    Error,
}

/// A parsed server reply. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Reported outcome
    pub status: ResponseStatus,
    /// Method-specific result payload
    pub result: Value,
    /// Correlation id, when the transport carries one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<Value>,
    /// Envelope type marker, when the transport carries one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub response_type: Option<String>,
}

impl Response {
    /// Parse either wire envelope into a response.
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| ModelError::Envelope("response must be an object".into()))?;

        // Message-oriented shape: status at the top level
        if let Some(status) = map.get("status").and_then(Value::as_str) {
            return Ok(Self {
                status: parse_status(status)?,
                result: map.get("result").cloned().unwrap_or(Value::Null),
                id: map.get("id").cloned(),
                response_type: map
                    .get("type")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }

        // HTTP shape: status nested inside result
        if let Some(result) = map.get("result") {
            let status = result
                .get("status")
                .and_then(Value::as_str)
                .ok_or_else(|| ModelError::Envelope("response carries no status".into()))?;
            return Ok(Self {
                status: parse_status(status)?,
                result: result.clone(),
                id: None,
                response_type: None,
            });
        }

        Err(ModelError::Envelope("response carries no result".into()))
    }

    /// Whether the server processed the request.
    pub fn is_successful(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Server error code, when the request was rejected.
    pub fn error_code(&self) -> Option<&str> {
        self.result.get("error").and_then(Value::as_str)
    }

    /// Human-readable error message, when present.
    pub fn error_message(&self) -> Option<&str> {
        self.result.get("error_message").and_then(Value::as_str)
    }
}

fn parse_status(status: &str) -> Result<ResponseStatus> {
    match status {
        "success" => Ok(ResponseStatus::Success),
        "error" => Ok(ResponseStatus::Error),
        other => Err(ModelError::Envelope(format!(
            "unknown response status: {}",
            other
        ))),
    }
}
