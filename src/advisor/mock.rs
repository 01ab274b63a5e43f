//! Mock transport for testing.
//!
//! Counts calls and returns a canned answer or error, optionally waiting on a
//! gate so tests can hold a request open.

use super::{ChatRequest, ChatTransport};
use crate::error::AdvisorError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub struct MockTransport {
    calls: AtomicUsize,
    failure: Option<String>,
    answer: String,
    gate: Option<Arc<Notify>>,
    last_request: Mutex<Option<ChatRequest>>,
}

impl MockTransport {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Hold every request until `gate` is notified.
    pub fn gated(answer: &str, gate: Arc<Notify>) -> Self {
        Self {
            answer: answer.to_string(),
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn complete(&self, request: &ChatRequest, _api_key: &str) -> Result<String, AdvisorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }

        match self.failure {
            Some(ref message) => Err(AdvisorError::Request(message.clone())),
            None => Ok(self.answer.clone()),
        }
    }
}
