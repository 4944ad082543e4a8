//! Models module - the fixed catalog of callable backends

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::ConfigError;
use crate::task::TaskType;

/// Vendor behind a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    Meta,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
            Provider::Meta => "meta",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static metadata for one callable model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model identifier as the chat-completion API expects it
    pub id: String,
    pub provider: Provider,
    /// Cost per 1K input tokens
    pub cost_per_1k_input: f64,
    /// Cost per 1K output tokens
    pub cost_per_1k_output: f64,
    /// Advertised latency, not measured
    pub expected_latency_ms: u64,
    /// Descriptive only; routing never reads it
    pub strengths: Vec<String>,
    pub max_context_length: u32,
    /// Descriptive only; routing never reads it
    pub best_for_task_types: Vec<TaskType>,
}

impl ModelDescriptor {
    /// Actual cost of a completed call
    pub fn cost_for(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        input_tokens as f64 / 1000.0 * self.cost_per_1k_input
            + output_tokens as f64 / 1000.0 * self.cost_per_1k_output
    }
}

/// Slot a model fills in the routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ModelRole {
    /// Lowest price per token, used for cost-first routing
    Cheapest = 0,
    /// Absolute lowest latency
    Fastest = 1,
    /// Low latency with broader competence
    FastCapable = 2,
    /// Real-time conversational replies
    Conversational = 3,
    DeepReasoning = 4,
    GeneralReasoning = 5,
    LongContext = 6,
    HighestAccuracy = 7,
}

impl ModelRole {
    pub const COUNT: usize = 8;

    pub const ALL: [ModelRole; ModelRole::COUNT] = [
        ModelRole::Cheapest,
        ModelRole::Fastest,
        ModelRole::FastCapable,
        ModelRole::Conversational,
        ModelRole::DeepReasoning,
        ModelRole::GeneralReasoning,
        ModelRole::LongContext,
        ModelRole::HighestAccuracy,
    ];

    /// Catalog id assigned to this role
    pub fn model_id(&self) -> &'static str {
        match self {
            ModelRole::Cheapest => LLAMA_3_1_8B,
            ModelRole::Fastest => GEMINI_FLASH,
            ModelRole::FastCapable => GPT_4O_MINI,
            ModelRole::Conversational => GPT_4O_MINI,
            ModelRole::DeepReasoning => CLAUDE_SONNET,
            ModelRole::GeneralReasoning => GPT_4O,
            ModelRole::LongContext => GEMINI_PRO,
            ModelRole::HighestAccuracy => CLAUDE_OPUS,
        }
    }
}

pub const LLAMA_3_1_8B: &str = "meta-llama/llama-3.1-8b-instruct";
pub const GEMINI_FLASH: &str = "google/gemini-flash-1.5";
pub const GPT_4O_MINI: &str = "openai/gpt-4o-mini";
pub const CLAUDE_SONNET: &str = "anthropic/claude-3.5-sonnet";
pub const GPT_4O: &str = "openai/gpt-4o";
pub const GEMINI_PRO: &str = "google/gemini-pro-1.5";
pub const CLAUDE_OPUS: &str = "anthropic/claude-3-opus";

/// Immutable catalog of models, built once at startup
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Vec<Arc<ModelDescriptor>>,
    by_id: HashMap<String, Arc<ModelDescriptor>>,
    by_role: [Arc<ModelDescriptor>; ModelRole::COUNT],
}

impl ModelRegistry {
    /// Build the catalog
    pub fn initialize() -> Self {
        let [llama, flash, mini, sonnet, gpt4o, pro, opus] = default_catalog().map(Arc::new);

        // Same order as ModelRole discriminants.
        let by_role = [
            Arc::clone(&llama),
            Arc::clone(&flash),
            Arc::clone(&mini),
            Arc::clone(&mini),
            Arc::clone(&sonnet),
            Arc::clone(&gpt4o),
            Arc::clone(&pro),
            Arc::clone(&opus),
        ];
        let models = vec![llama, flash, mini, sonnet, gpt4o, pro, opus];
        let by_id = models
            .iter()
            .map(|m| (m.id.clone(), Arc::clone(m)))
            .collect();

        Self {
            models,
            by_id,
            by_role,
        }
    }

    /// Fetch a descriptor by id
    pub fn lookup(&self, id: &str) -> Result<&ModelDescriptor, ConfigError> {
        self.by_id
            .get(id)
            .map(|m| m.as_ref())
            .ok_or_else(|| ConfigError::UnknownModel(id.to_string()))
    }

    /// The model filling a routing role
    pub fn for_role(&self, role: ModelRole) -> &ModelDescriptor {
        &self.by_role[role as usize]
    }

    /// All models in catalog order
    pub fn all(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter().map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::initialize()
    }
}

fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_catalog() -> [ModelDescriptor; 7] {
    [
        ModelDescriptor {
            id: LLAMA_3_1_8B.to_string(),
            provider: Provider::Meta,
            cost_per_1k_input: 0.00005,
            cost_per_1k_output: 0.00005,
            expected_latency_ms: 900,
            strengths: tags(&["low cost", "bulk generation", "simple extraction"]),
            max_context_length: 131_072,
            best_for_task_types: vec![TaskType::PointCalculation, TaskType::EmailCopy],
        },
        ModelDescriptor {
            id: GEMINI_FLASH.to_string(),
            provider: Provider::Google,
            cost_per_1k_input: 0.000075,
            cost_per_1k_output: 0.0003,
            expected_latency_ms: 400,
            strengths: tags(&["speed", "short-form copy", "structured output"]),
            max_context_length: 1_000_000,
            best_for_task_types: vec![
                TaskType::EmailCopy,
                TaskType::ChallengeGeneration,
                TaskType::PointCalculation,
            ],
        },
        ModelDescriptor {
            id: GPT_4O_MINI.to_string(),
            provider: Provider::OpenAi,
            cost_per_1k_input: 0.00015,
            cost_per_1k_output: 0.0006,
            expected_latency_ms: 700,
            strengths: tags(&["conversation", "real-time replies", "instruction following"]),
            max_context_length: 128_000,
            best_for_task_types: vec![TaskType::Chat, TaskType::CustomerResponse],
        },
        ModelDescriptor {
            id: CLAUDE_SONNET.to_string(),
            provider: Provider::Anthropic,
            cost_per_1k_input: 0.003,
            cost_per_1k_output: 0.015,
            expected_latency_ms: 2500,
            strengths: tags(&["deep reasoning", "nuanced writing", "qualification"]),
            max_context_length: 200_000,
            best_for_task_types: vec![TaskType::LeadQualification, TaskType::CustomerResponse],
        },
        ModelDescriptor {
            id: GPT_4O.to_string(),
            provider: Provider::OpenAi,
            cost_per_1k_input: 0.0025,
            cost_per_1k_output: 0.01,
            expected_latency_ms: 2000,
            strengths: tags(&["general reasoning", "analysis", "creative"]),
            max_context_length: 128_000,
            best_for_task_types: vec![TaskType::LeadQualification, TaskType::ChallengeGeneration],
        },
        ModelDescriptor {
            id: GEMINI_PRO.to_string(),
            provider: Provider::Google,
            cost_per_1k_input: 0.00125,
            cost_per_1k_output: 0.005,
            expected_latency_ms: 3000,
            strengths: tags(&["long context", "itinerary planning", "document analysis"]),
            max_context_length: 2_000_000,
            best_for_task_types: vec![TaskType::TripRecommendation],
        },
        ModelDescriptor {
            id: CLAUDE_OPUS.to_string(),
            provider: Provider::Anthropic,
            cost_per_1k_input: 0.015,
            cost_per_1k_output: 0.075,
            expected_latency_ms: 4000,
            strengths: tags(&["highest accuracy", "policy judgement", "careful analysis"]),
            max_context_length: 200_000,
            best_for_task_types: vec![TaskType::RefundDecision],
        },
    ]
}
