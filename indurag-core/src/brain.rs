//! The generation backend interface.
//!
//! Every tier of the provider chain except the rule-based extractor implements
//! [`LlmProvider`]: text in, text out, with an explicit success or failure
//! value. Timeouts are the implementation's job.

use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Trait for text-in/text-out generation backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform a single non-streaming completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Short backend name used in logs and outcome bookkeeping.
    fn provider_name(&self) -> &str;

    /// Return the model name.
    fn model_name(&self) -> &str;
}

/// A scripted provider for tests.
///
/// Replies are returned in the order queued; once the queue is empty every
/// call fails with a connection error. Each received request is recorded.
pub struct MockLlmProvider {
    name: String,
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that answers every call with `text`.
    pub fn with_response(name: &str, text: &str) -> Self {
        let provider = Self::new(name);
        for _ in 0..20 {
            provider.queue_text(text);
        }
        provider
    }

    /// A provider that fails every call.
    pub fn failing(name: &str) -> Self {
        Self::new(name)
    }

    pub fn queue_text(&self, text: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Number of `complete` calls received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(text)) => Ok(CompletionResponse {
                text,
                model: "mock-model".to_string(),
            }),
            Some(Err(e)) => Err(e),
            None => Err(LlmError::Connection {
                message: format!("{}: no scripted reply", self.name),
            }),
        }
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
