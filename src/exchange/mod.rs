// ABOUTME: Exchange module — wire types and the transport seam for one chat round trip.
// ABOUTME: The widget dispatches a ChatRequest and receives an ExchangeOutcome back.

pub mod error;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::ExchangeError;
pub use http::HttpTransport;

/// Outbound payload for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Inbound payload. The endpoint sends either `{"response": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatReply {
    /// A successful reply carrying response text.
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            error: None,
        }
    }

    /// A reply carrying an application-level error.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(error.into()),
        }
    }

    /// The application-level error, if one is present. An empty string counts as absent.
    pub fn application_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// The settled result of one exchange, tagged with the sequence number it was dispatched under.
#[derive(Debug)]
pub struct ExchangeOutcome {
    pub seq: u64,
    pub result: Result<ChatReply, ExchangeError>,
}

/// Carries a chat request to the remote endpoint.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_message_object() {
        let request = ChatRequest {
            message: "hello".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "hello" }));
    }

    #[test]
    fn reply_parses_success_shape() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"**hi**"}"#).unwrap();
        assert_eq!(reply.response.as_deref(), Some("**hi**"));
        assert_eq!(reply.application_error(), None);
    }

    #[test]
    fn reply_parses_error_shape() {
        let reply: ChatReply = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(reply.response, None);
        assert_eq!(reply.application_error(), Some("boom"));
    }

    #[test]
    fn empty_error_field_is_not_an_error() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"ok","error":""}"#).unwrap();
        assert_eq!(reply.application_error(), None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response":"ok","model":"gemini"}"#).unwrap();
        assert_eq!(reply, ChatReply::text("ok"));
    }
}
