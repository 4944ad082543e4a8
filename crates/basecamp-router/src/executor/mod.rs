//! Execution engine - performs one model call and accounts for it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::RouterError;
use crate::models::{ModelDescriptor, Provider};
use crate::observability::{LatencyEntry, Observability};
use crate::transport::{ChatRequest, ChatTransport, Message};

/// Used when the caller supplies no system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

// Sampling parameters are the same for every task so routing stays reproducible.
pub const MAX_TOKENS: u32 = 2000;
pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.9;

/// Measured outcome of a completed call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub request_id: Uuid,
    /// Raw provider text; never parsed here
    pub content: String,
    pub model_id: String,
    pub provider: Provider,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
    /// Computed from reported usage
    pub cost: f64,
    /// Wall clock around the call and response parsing
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Calls a model through a transport and folds the outcome into metrics
#[derive(Debug, Clone)]
pub struct Executor {
    transport: Arc<dyn ChatTransport>,
    observability: Arc<Observability>,
}

impl Executor {
    pub fn new(transport: Arc<dyn ChatTransport>, observability: Arc<Observability>) -> Self {
        Self {
            transport,
            observability,
        }
    }

    /// Build the fixed-shape request for a model
    pub fn build_request(
        model: &ModelDescriptor,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> ChatRequest {
        ChatRequest {
            model: model.id.clone(),
            messages: vec![
                Message::system(system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT)),
                Message::user(prompt),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }

    /// Perform exactly one call
    ///
    /// Failures propagate unchanged apart from model context; nothing is
    /// retried and metrics are only touched on success.
    #[instrument(skip_all, fields(model = %model.id, provider = %model.provider))]
    pub async fn execute(
        &self,
        model: &ModelDescriptor,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<ExecutionResult, RouterError> {
        let request = Self::build_request(model, prompt, system_prompt);

        let start = Instant::now();
        let completion = self
            .transport
            .complete(&request)
            .await
            .map_err(|e| RouterError::from_transport(&model.id, model.provider, e))?;
        let latency_ms = start.elapsed().as_millis() as u64;

        let input_tokens = completion.usage.prompt_tokens;
        let output_tokens = completion.usage.completion_tokens;
        let cost = model.cost_for(input_tokens, output_tokens);
        let timestamp = Utc::now();

        self.observability.record_execution(
            LatencyEntry {
                model_id: model.id.clone(),
                provider: model.provider,
                latency_ms,
                timestamp,
            },
            cost,
        );

        let result = ExecutionResult {
            request_id: Uuid::new_v4(),
            content: completion.content,
            model_id: model.id.clone(),
            provider: model.provider,
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
            cost,
            latency_ms,
            timestamp,
        };

        info!(
            request_id = %result.request_id,
            transport = self.transport.name(),
            input_tokens,
            output_tokens,
            cost = result.cost,
            latency_ms,
            "LLM call completed"
        );

        Ok(result)
    }
}
