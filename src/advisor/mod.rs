//! Natural-language questions about spending, answered by a chat-completion model.
//!
//! # Architecture
//!
//! - `ChatTransport` trait: sends one chat request and returns the answer text
//! - `OpenAiClient`: HTTP implementation for chat-completions style APIs
//! - `Advisor`: checks the credential, builds the aggregate-only prompt and
//!   makes a single call per question

pub mod client;
#[cfg(test)]
pub mod mock;
pub mod prompt;
pub mod service;

pub use client::OpenAiClient;
pub use service::{credential_from_env, Advisor, AdvisorSettings};

use crate::error::AdvisorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One message of a chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Sends a chat request to a language-model service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the request once, authenticating with `api_key`.
    async fn complete(&self, request: &ChatRequest, api_key: &str) -> Result<String, AdvisorError>;
}
