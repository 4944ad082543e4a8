//! Mock transport for testing and dry runs

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{ChatCompletion, ChatRequest, ChatTransport, TokenUsage, TransportError};

/// Replays scripted outcomes in order, cycling when it runs out
#[derive(Debug)]
pub struct MockTransport {
    outcomes: Vec<Result<ChatCompletion, TransportError>>,
    index: AtomicUsize,
    latency: Duration,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockTransport {
    /// Create a mock with scripted outcomes
    pub fn new(outcomes: Vec<Result<ChatCompletion, TransportError>>) -> Self {
        Self {
            outcomes,
            index: AtomicUsize::new(0),
            latency: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with the same content and usage
    pub fn constant(content: &str, prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self::new(vec![Ok(ChatCompletion {
            content: content.to_string(),
            usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
            },
        })])
    }

    /// Echo the user prompt back, with usage estimated at four characters per token
    pub fn echo() -> Self {
        Self::new(Vec::new())
    }

    /// Simulate network latency on every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn echo_completion(request: &ChatRequest) -> ChatCompletion {
        let prompt = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let prompt_chars: usize = request.messages.iter().map(|m| m.content.len()).sum();

        ChatCompletion {
            content: format!("[{}] {}", request.model, prompt),
            usage: TokenUsage {
                prompt_tokens: (prompt_chars / 4) as u32,
                completion_tokens: (prompt.len() / 4) as u32 + 8,
            },
        }
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, TransportError> {
        self.requests.lock().push(request.clone());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.outcomes.is_empty() {
            return Ok(Self::echo_completion(request));
        }

        let idx = self.index.fetch_add(1, Ordering::Relaxed);
        self.outcomes[idx % self.outcomes.len()].clone()
    }
}
