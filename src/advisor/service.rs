//! The advisor service: one question in, one answer (or typed failure) out.

use super::prompt::{build_context, build_prompt, SYSTEM_PROMPT};
use super::{ChatMessage, ChatRequest, ChatTransport};
use crate::error::AdvisorError;
use crate::models::AggregateSnapshot;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Model settings for advisor requests.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorSettings {
    pub model: String,
    /// Environment variable the credential is read from.
    pub api_key_env: String,
    pub temperature: Option<f32>,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: None,
        }
    }
}

impl From<&crate::config::AdvisorConfig> for AdvisorSettings {
    fn from(config: &crate::config::AdvisorConfig) -> Self {
        Self {
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            temperature: config.temperature,
        }
    }
}

/// Read a non-empty credential from the environment.
pub fn credential_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Answers spending questions through a [`ChatTransport`].
///
/// At most one question is outstanding at a time; a second `ask` while one
/// is in flight fails with [`AdvisorError::Busy`] instead of queueing.
pub struct Advisor<T> {
    transport: T,
    settings: AdvisorSettings,
    api_key: Option<String>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the call finishes, however it finishes.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T: ChatTransport> Advisor<T> {
    pub fn new(transport: T, settings: AdvisorSettings, api_key: Option<String>) -> Self {
        info!(
            "Advisor using model {} (credential {})",
            settings.model,
            if api_key.is_some() { "present" } else { "missing" }
        );

        Self {
            transport,
            settings,
            api_key,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ask one question about the spending summarized in `snapshot`.
    ///
    /// The credential is checked before anything else; without it no request
    /// is built or sent. Transport failures come back with their message intact.
    pub async fn ask(&self, question: &str, snapshot: &AggregateSnapshot) -> Result<String, AdvisorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AdvisorError::MissingCredential {
                env_var: self.settings.api_key_env.clone(),
            })?;

        if snapshot.is_empty() {
            return Err(AdvisorError::EmptyTable);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Ignoring question while another is in flight");
            return Err(AdvisorError::Busy);
        }
        let _guard = InFlight(&self.in_flight);

        let context = build_context(snapshot);
        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(&context, question)),
            ],
            temperature: self.settings.temperature,
        };

        debug!("Asking advisor: {}", question);
        let answer = self.transport.complete(&request, api_key).await;
        if let Err(ref e) = answer {
            warn!("Advisor request failed: {}", e);
        }
        answer
    }
}
