//! Chat-completion transport - the router's only network boundary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, RouterSettings};

mod mock;

pub use mock::MockTransport;

/// Errors from the chat-completion endpoint
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("No API credential configured")]
    MissingCredential,
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
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

/// Request body sent to the endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Parsed result of one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub content: String,
    pub usage: TokenUsage,
}

/// Something that can answer a chat-completion request
#[async_trait]
pub trait ChatTransport: Send + Sync + std::fmt::Debug {
    /// Transport name, for logs
    fn name(&self) -> &str;

    /// Perform exactly one call. No retries.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, TransportError>;
}

// Wire format of the response. Everything is optional so a missing field
// surfaces as InvalidResponse rather than a serde error.
#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<MessageContent>,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

impl CompletionBody {
    fn into_completion(self) -> Result<ChatCompletion, TransportError> {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| {
                TransportError::InvalidResponse(
                    "missing choices[0].message.content".to_string(),
                )
            })?;

        let usage = self
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens.unwrap_or(0),
                completion_tokens: u.completion_tokens.unwrap_or(0),
            })
            .unwrap_or_default();

        Ok(ChatCompletion { content, usage })
    }
}

/// Parse a raw response body
pub fn parse_completion(body: &str) -> Result<ChatCompletion, TransportError> {
    let parsed: CompletionBody = serde_json::from_str(body)
        .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
    parsed.into_completion()
}

/// OpenAI-compatible HTTP transport (OpenRouter by default)
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    site_url: String,
    app_name: String,
}

impl HttpTransport {
    /// Build the HTTP client with the configured deadline
    pub fn new(settings: &RouterSettings) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.request_timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: settings.completions_url(),
            api_key: settings.api_key.clone(),
            site_url: settings.site_url.clone(),
            app_name: settings.app_name.clone(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, TransportError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TransportError::MissingCredential)?;

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.app_name)
            .json(request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_reqwest_error)?;

        if !status.is_success() {
            return Err(TransportError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else {
        TransportError::ConnectionFailed(err.to_string())
    }
}
