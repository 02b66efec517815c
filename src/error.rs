//! Error handling for the Thunder client
//!
//! Every service call fails in one of three ways: a missing credential caught
//! before any network traffic, a transport failure, or a failure reported by
//! the backend whose body is carried verbatim. Screens turn these into
//! user-facing text through [`ClientError::user_message`].

use serde_json::Value as JsonValue;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Message carried by [`ClientError::Unauthenticated`].
pub const NO_AUTH_TOKEN: &str = "no auth token found";

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// No bearer token was available; the request was never sent.
    #[error("no auth token found")]
    Unauthenticated,

    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-2xx response. `body` is the backend's error body as received.
    #[error("API error: status={status}, body={body}")]
    Api { status: u16, body: JsonValue },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
}

impl ClientError {
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        ClientError::Validation {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ClientError::Unauthenticated)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human readable message from a backend error body, if it carries one.
    ///
    /// Looks at `message`, then `error` (string or `{ message }`), then a bare
    /// string body.
    pub fn backend_message(&self) -> Option<String> {
        let ClientError::Api { body, .. } = self else {
            return None;
        };

        if let Some(text) = body.as_str() {
            return non_empty(text);
        }
        if let Some(text) = body.get("message").and_then(JsonValue::as_str) {
            return non_empty(text);
        }
        match body.get("error") {
            Some(JsonValue::String(text)) => non_empty(text),
            Some(nested) => nested
                .get("message")
                .and_then(JsonValue::as_str)
                .and_then(non_empty),
            None => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthenticated => "Please sign in to continue".to_string(),
            ClientError::Network { .. } => {
                "Unable to reach Thunder. Check your connection and try again".to_string()
            }
            ClientError::Api { .. } => self
                .backend_message()
                .unwrap_or_else(|| "Request failed. Please try again".to_string()),
            ClientError::Decode { .. } => "Unexpected response from server".to_string(),
            ClientError::Validation { message, .. } => message.clone(),
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
