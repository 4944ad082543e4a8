//! Routing policy - maps a task description to exactly one model
//!
//! This is a fixed decision table, not a scored ranking. Dispatch is
//! priority first, then task type, then complexity. Every branch ends in a
//! concrete model, so routing cannot fail.

use serde::Serialize;
use std::sync::Arc;

use crate::config::DEFAULT_INPUT_LENGTH;
use crate::models::{ModelDescriptor, ModelRegistry, ModelRole};
use crate::task::{Complexity, Priority, TaskContext, TaskType};

/// Inputs above this many tokens go to the long-context model under quality routing
pub const LONG_CONTEXT_THRESHOLD: u32 = 50_000;

/// A routing decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    pub model: ModelDescriptor,
    /// Human-readable justification, for logs only
    pub reason: String,
    /// Advisory; never reconciled with the real cost
    pub estimated_cost: f64,
    pub estimated_latency_ms: u64,
}

/// The decision table
#[derive(Debug, Clone)]
pub struct RoutingPolicy {
    registry: Arc<ModelRegistry>,
    default_input_length: u32,
}

impl RoutingPolicy {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            default_input_length: DEFAULT_INPUT_LENGTH,
        }
    }

    /// Override the length assumed when a task has no hint
    pub fn with_default_input_length(mut self, tokens: u32) -> Self {
        self.default_input_length = tokens;
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Pick a model for the task
    pub fn route(&self, ctx: &TaskContext) -> RoutingDecision {
        let (role, reason) = match ctx.priority {
            Priority::Cost => route_cost(),
            Priority::Speed => route_speed(ctx),
            Priority::Quality => route_quality(ctx),
            Priority::Balanced => route_balanced(ctx),
        };

        let model = self.registry.for_role(role);
        let input_length = ctx.input_length.unwrap_or(self.default_input_length);

        RoutingDecision {
            model: model.clone(),
            reason,
            estimated_cost: input_length as f64 / 1000.0 * model.cost_per_1k_input,
            estimated_latency_ms: model.expected_latency_ms,
        }
    }
}

// =========================================================================
// Priority branches
// =========================================================================

fn route_cost() -> (ModelRole, String) {
    (
        ModelRole::Cheapest,
        "Cost priority: most cost-effective model regardless of task".to_string(),
    )
}

fn route_speed(ctx: &TaskContext) -> (ModelRole, String) {
    if ctx.task_type.is_short_form() {
        (
            ModelRole::Fastest,
            format!("Speed priority: fastest model for short-form {}", ctx.task_type),
        )
    } else {
        (
            ModelRole::FastCapable,
            format!(
                "Speed priority: fast model with broader competence for {}",
                ctx.task_type
            ),
        )
    }
}

fn route_quality(ctx: &TaskContext) -> (ModelRole, String) {
    if ctx.task_type == TaskType::RefundDecision || ctx.complexity == Complexity::Complex {
        return (
            ModelRole::HighestAccuracy,
            format!(
                "Quality priority: highest-accuracy model for {} ({})",
                ctx.task_type, ctx.complexity
            ),
        );
    }

    let long_input = ctx
        .input_length
        .is_some_and(|tokens| tokens > LONG_CONTEXT_THRESHOLD);
    if ctx.task_type == TaskType::TripRecommendation || long_input {
        return (
            ModelRole::LongContext,
            format!(
                "Quality priority: long-context reasoning model for {}",
                ctx.task_type
            ),
        );
    }

    (
        ModelRole::GeneralReasoning,
        format!(
            "Quality priority: general high-reasoning model for {}",
            ctx.task_type
        ),
    )
}

fn route_balanced(ctx: &TaskContext) -> (ModelRole, String) {
    let role = match (ctx.task_type, ctx.complexity) {
        (TaskType::LeadQualification, _) => ModelRole::DeepReasoning,
        (TaskType::CustomerResponse, Complexity::Complex) => ModelRole::DeepReasoning,
        (TaskType::CustomerResponse, _) => ModelRole::Conversational,
        (TaskType::Chat, _) => ModelRole::Conversational,
        (TaskType::TripRecommendation, _) => ModelRole::LongContext,
        (TaskType::RefundDecision, _) => ModelRole::HighestAccuracy,
        (TaskType::EmailCopy | TaskType::ChallengeGeneration | TaskType::PointCalculation, _) => {
            ModelRole::Fastest
        }
        (TaskType::Other, _) => {
            return (
                ModelRole::Fastest,
                format!(
                    "Balanced priority: no table entry for {}, using the cheap fast default",
                    ctx.task_type
                ),
            )
        }
    };

    (
        role,
        format!(
            "Balanced priority: table entry for {} ({})",
            ctx.task_type, ctx.complexity
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CLAUDE_OPUS, CLAUDE_SONNET, GEMINI_FLASH, GEMINI_PRO, GPT_4O, GPT_4O_MINI, LLAMA_3_1_8B,
    };

    fn policy() -> RoutingPolicy {
        RoutingPolicy::new(Arc::new(ModelRegistry::initialize()))
    }

    fn ctx(task_type: TaskType, priority: Priority, complexity: Complexity) -> TaskContext {
        TaskContext::new(task_type, priority, complexity)
    }

    #[test]
    fn test_cost_priority_always_cheapest() {
        let policy = policy();
        for task_type in TaskType::ALL {
            for complexity in Complexity::ALL {
                let decision = policy.route(&ctx(task_type, Priority::Cost, complexity));
                assert_eq!(decision.model.id, LLAMA_3_1_8B);
            }
        }
    }

    #[test]
    fn test_total_over_cross_product() {
        let policy = policy();
        for task_type in TaskType::ALL {
            for priority in Priority::ALL {
                for complexity in Complexity::ALL {
                    let c = ctx(task_type, priority, complexity);
                    let first = policy.route(&c);
                    assert!(!first.reason.is_empty());
                    assert!(policy.registry().lookup(&first.model.id).is_ok());
                    // Deterministic
                    assert_eq!(policy.route(&c), first);
                }
            }
        }
    }

    #[test]
    fn test_estimated_cost_formula() {
        let policy = policy();
        for input_length in [None, Some(0), Some(1), Some(2_500), Some(120_000)] {
            let mut c = ctx(TaskType::Chat, Priority::Quality, Complexity::Medium);
            c.input_length = input_length;
            let decision = policy.route(&c);
            let expected =
                input_length.unwrap_or(DEFAULT_INPUT_LENGTH) as f64 / 1000.0
                    * decision.model.cost_per_1k_input;
            assert_eq!(decision.estimated_cost, expected);
            assert_eq!(
                decision.estimated_latency_ms,
                decision.model.expected_latency_ms
            );
        }
    }

    #[test]
    fn test_custom_default_input_length() {
        let policy = policy().with_default_input_length(4000);
        let decision = policy.route(&ctx(TaskType::Chat, Priority::Cost, Complexity::Simple));
        assert_eq!(
            decision.estimated_cost,
            4.0 * decision.model.cost_per_1k_input
        );
    }

    #[test]
    fn test_point_calculation_cost_mentions_cost_effectiveness() {
        let decision = policy().route(&ctx(
            TaskType::PointCalculation,
            Priority::Cost,
            Complexity::Medium,
        ));
        assert_eq!(decision.model.id, LLAMA_3_1_8B);
        assert!(decision.reason.contains("cost-effective"));
    }

    #[test]
    fn test_speed_priority() {
        let policy = policy();
        for task_type in [TaskType::EmailCopy, TaskType::PointCalculation] {
            let d = policy.route(&ctx(task_type, Priority::Speed, Complexity::Complex));
            assert_eq!(d.model.id, GEMINI_FLASH);
        }
        for task_type in [
            TaskType::LeadQualification,
            TaskType::TripRecommendation,
            TaskType::RefundDecision,
            TaskType::Chat,
            TaskType::Other,
        ] {
            let d = policy.route(&ctx(task_type, Priority::Speed, Complexity::Simple));
            assert_eq!(d.model.id, GPT_4O_MINI);
        }
    }

    #[test]
    fn test_refund_quality_is_highest_accuracy() {
        let policy = policy();
        for complexity in Complexity::ALL {
            let c = ctx(TaskType::RefundDecision, Priority::Quality, complexity)
                .with_input_length(200_000);
            assert_eq!(policy.route(&c).model.id, CLAUDE_OPUS);
        }
    }

    #[test]
    fn test_quality_complex_beats_long_context() {
        let c = ctx(TaskType::TripRecommendation, Priority::Quality, Complexity::Complex);
        assert_eq!(policy().route(&c).model.id, CLAUDE_OPUS);
    }

    #[test]
    fn test_quality_long_context() {
        let policy = policy();
        let trip = ctx(TaskType::TripRecommendation, Priority::Quality, Complexity::Simple);
        assert_eq!(policy.route(&trip).model.id, GEMINI_PRO);

        let long_email = ctx(TaskType::EmailCopy, Priority::Quality, Complexity::Medium)
            .with_input_length(LONG_CONTEXT_THRESHOLD + 1);
        assert_eq!(policy.route(&long_email).model.id, GEMINI_PRO);

        // Threshold is exclusive
        let at_threshold = ctx(TaskType::EmailCopy, Priority::Quality, Complexity::Medium)
            .with_input_length(LONG_CONTEXT_THRESHOLD);
        assert_eq!(policy.route(&at_threshold).model.id, GPT_4O);
    }

    #[test]
    fn test_balanced_table() {
        let policy = policy();
        let cases = [
            (TaskType::LeadQualification, Complexity::Simple, CLAUDE_SONNET),
            (TaskType::CustomerResponse, Complexity::Complex, CLAUDE_SONNET),
            (TaskType::CustomerResponse, Complexity::Simple, GPT_4O_MINI),
            (TaskType::CustomerResponse, Complexity::Medium, GPT_4O_MINI),
            (TaskType::Chat, Complexity::Complex, GPT_4O_MINI),
            (TaskType::EmailCopy, Complexity::Complex, GEMINI_FLASH),
            (TaskType::ChallengeGeneration, Complexity::Medium, GEMINI_FLASH),
            (TaskType::PointCalculation, Complexity::Simple, GEMINI_FLASH),
            (TaskType::TripRecommendation, Complexity::Simple, GEMINI_PRO),
            (TaskType::RefundDecision, Complexity::Simple, CLAUDE_OPUS),
            (TaskType::Other, Complexity::Complex, GEMINI_FLASH),
        ];
        for (task_type, complexity, expected) in cases {
            let d = policy.route(&ctx(task_type, Priority::Balanced, complexity));
            assert_eq!(d.model.id, expected, "{task_type} ({complexity})");
        }
    }
}
