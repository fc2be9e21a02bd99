//! Request error normalization
//!
//! Every failed call against the Galaxy API is reduced to a single
//! [`RequestError`] carrying a human-readable message. The message is picked
//! in a fixed order:
//!
//! 1. the server-supplied `err_msg` field of the response body,
//! 2. otherwise `"{status text} ({status code})"`,
//! 3. or `"Request failed."` when no response was received at all.

use reqwest::StatusCode;
use serde_json::Value;

/// Message used when the server never answered.
pub const REQUEST_FAILED: &str = "Request failed.";

/// The single failure type surfaced by every workflow operation.
///
/// `Display` yields exactly the normalized message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    message: String,
    status: Option<StatusCode>,
}

impl RequestError {
    /// Build an error from a raw transport failure.
    ///
    /// `response` is the status and body of the server response, or `None`
    /// when the request never produced one (connection refused, DNS, ...).
    pub fn from_failure(response: Option<(StatusCode, &[u8])>) -> Self {
        Self {
            message: error_message(response),
            status: response.map(|(status, _)| status),
        }
    }

    /// No response was received.
    pub fn request_failed() -> Self {
        Self::from_failure(None)
    }

    /// A response arrived but its payload could not be used.
    pub fn invalid_response(reason: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Invalid response: {}", reason),
            status: None,
        }
    }

    /// The request could not be built locally.
    pub fn invalid_request(reason: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Invalid request: {}", reason),
            status: None,
        }
    }

    /// Read the status and body of a failed response and normalize them.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        Self::from_failure(Some((status, &body[..])))
    }

    /// The normalized, human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }
}

/// Derive the message for a transport failure.
pub fn error_message(response: Option<(StatusCode, &[u8])>) -> String {
    let Some((status, body)) = response else {
        return REQUEST_FAILED.to_string();
    };

    let server_message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|body| match body.get("err_msg") {
            Some(Value::String(msg)) if !msg.is_empty() => Some(msg.clone()),
            _ => None,
        });

    server_message.unwrap_or_else(|| {
        format!(
            "{} ({})",
            status.canonical_reason().unwrap_or("Unknown Status"),
            status.as_u16()
        )
    })
}
