//! HTTP transport for chat-completions style APIs.
//!
//! Works with any server implementing `POST /v1/chat/completions` with bearer
//! authentication (OpenAI and compatible services).

use super::{ChatRequest, ChatTransport};
use crate::error::AdvisorError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Chat-completions response (only the fields we read).
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// reqwest-backed transport.
pub struct OpenAiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client for `base_url`. Without a timeout the reqwest default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatTransport for OpenAiClient {
    async fn complete(&self, request: &ChatRequest, api_key: &str) -> Result<String, AdvisorError> {
        debug!(
            "Sending chat request with {} messages to {}",
            request.messages.len(),
            self.base_url
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AdvisorError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Request(format!("API error {}: {}", status, body)));
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::Request(format!("Failed to parse response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AdvisorError::Request("No answer in response".to_string()))
    }
}
