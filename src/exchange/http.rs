// ABOUTME: HTTP transport — posts chat requests to the configured endpoint with reqwest.
// ABOUTME: Maps status codes and malformed bodies to ExchangeError variants.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::EndpointConfig;
use crate::exchange::{ChatReply, ChatRequest, ChatTransport, ExchangeError};

/// Path of the server's connectivity probe.
pub const HEALTH_PATH: &str = "/test-api";

/// Body of the connectivity probe.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub models: Vec<String>,
}

/// reqwest-backed chat transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    chat_url: String,
    health_url: String,
}

impl HttpTransport {
    /// Build a transport for the given endpoint settings.
    pub fn new(endpoint: &EndpointConfig) -> Result<Self, ExchangeError> {
        let mut builder = Client::builder();
        if let Some(timeout) = endpoint.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            chat_url: endpoint.chat_url(),
            health_url: endpoint.url_for(HEALTH_PATH),
        })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Ask the server whether it can reach its model backend.
    pub async fn check(&self) -> Result<HealthReport, ExchangeError> {
        debug!(url = %self.health_url, "probing endpoint");
        let response = self.client.get(&self.health_url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        // The probe reports failures as JSON with a 500, so try the body first.
        match serde_json::from_slice::<HealthReport>(&body) {
            Ok(report) if status.is_success() => Ok(report),
            Ok(report) => Err(ExchangeError::Application(report.message)),
            Err(_) if !status.is_success() => Err(ExchangeError::Status(status.as_u16())),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError> {
        debug!(url = %self.chat_url, chars = request.message.chars().count(), "sending chat request");

        // reqwest's .json() sets Content-Type: application/json.
        let response = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let reply: ChatReply = serde_json::from_slice(&body)?;
        debug!(status = status.as_u16(), "chat response received");
        Ok(reply)
    }
}
