//! Router - the task router façade
//!
//! Construct one `TaskRouter` at process start and pass it by reference to
//! whatever needs it. It owns the registry, the policy, the executor and the
//! metrics for the life of the process.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::batch::{BatchOrchestrator, BatchReport, BatchTask};
use crate::config::RouterSettings;
use crate::error::RouterError;
use crate::executor::{ExecutionResult, Executor};
use crate::models::{ModelRegistry, Provider};
use crate::observability::{ModelPerformance, Observability};
use crate::policy::{RoutingDecision, RoutingPolicy};
use crate::task::TaskContext;
use crate::transport::{ChatTransport, HttpTransport};

/// Routes tasks to models, calls them and tracks spend
#[derive(Debug)]
pub struct TaskRouter {
    registry: Arc<ModelRegistry>,
    policy: RoutingPolicy,
    executor: Executor,
    observability: Arc<Observability>,
    settings: RouterSettings,
}

impl TaskRouter {
    /// Create a router that talks HTTP with the given settings
    ///
    /// A missing credential is logged and tolerated; calls will fail later.
    pub fn new(settings: RouterSettings) -> Result<Self, RouterError> {
        Self::builder().settings(settings).build()
    }

    /// Create a router from environment settings
    pub fn from_env() -> Result<Self, RouterError> {
        Self::new(RouterSettings::from_env()?)
    }

    /// Get a builder for configuration
    pub fn builder() -> TaskRouterBuilder {
        TaskRouterBuilder::new()
    }

    /// Decide which model a task should use. Pure, never fails.
    pub fn route_task(&self, ctx: &TaskContext) -> RoutingDecision {
        let decision = self.policy.route(ctx);
        debug!(
            task_type = %ctx.task_type,
            priority = %ctx.priority,
            complexity = %ctx.complexity,
            caller = ctx.caller_id.as_deref().unwrap_or("-"),
            model = %decision.model.id,
            estimated_cost = decision.estimated_cost,
            reason = %decision.reason,
            "Routed task"
        );
        decision
    }

    /// Route a task, then call the chosen model once
    pub async fn execute_task(
        &self,
        prompt: &str,
        ctx: &TaskContext,
        system_prompt: Option<&str>,
    ) -> Result<ExecutionResult, RouterError> {
        let decision = self.route_task(ctx);
        self.executor
            .execute(&decision.model, prompt, system_prompt)
            .await
    }

    /// Run tasks sequentially with the configured pacing
    pub async fn execute_batch(&self, tasks: &[BatchTask]) -> BatchReport {
        BatchOrchestrator::new(self, self.settings.batch_pacing)
            .run(tasks)
            .await
    }

    /// Provider -> cumulative cost
    pub fn cost_breakdown(&self) -> HashMap<Provider, f64> {
        self.observability.cost_breakdown()
    }

    /// Per-model latency stats
    pub fn performance_summary(&self) -> BTreeMap<String, ModelPerformance> {
        self.observability.performance_summary()
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn observability(&self) -> &Observability {
        &self.observability
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }
}

/// Builder for TaskRouter
#[derive(Debug, Default)]
pub struct TaskRouterBuilder {
    settings: RouterSettings,
    transport: Option<Arc<dyn ChatTransport>>,
}

impl TaskRouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(mut self, settings: RouterSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use a custom transport instead of HTTP
    pub fn transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<TaskRouter, RouterError> {
        let transport: Arc<dyn ChatTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                if let Err(err) = self.settings.require_api_key() {
                    warn!(error = %err, "No LLM credential configured; calls will fail");
                }
                Arc::new(HttpTransport::new(&self.settings)?)
            }
        };

        let registry = Arc::new(ModelRegistry::initialize());
        let policy = RoutingPolicy::new(Arc::clone(&registry))
            .with_default_input_length(self.settings.default_input_length);
        let observability = Arc::new(Observability::new());
        let executor = Executor::new(transport, Arc::clone(&observability));

        Ok(TaskRouter {
            registry,
            policy,
            executor,
            observability,
            settings: self.settings,
        })
    }
}
