//! Batch orchestration - sequential execution with per-task failure isolation

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::RouterError;
use crate::executor::ExecutionResult;
use crate::router::TaskRouter;
use crate::task::TaskContext;

/// One item of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTask {
    pub prompt: String,
    pub context: TaskContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl BatchTask {
    pub fn new(prompt: impl Into<String>, context: TaskContext) -> Self {
        Self {
            prompt: prompt.into(),
            context,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Outcome of one batch item, in input position
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Succeeded(ExecutionResult),
    Failed { index: usize, error: RouterError },
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded(_))
    }
}

/// Aggregates over the successful items of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub attempted: usize,
    pub total_cost: f64,
    /// Mean over successes; zero when nothing succeeded
    pub average_latency_ms: f64,
}

/// Result of a batch run: one outcome per input, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<TaskOutcome>,
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Successful results only, in input order
    pub fn results(&self) -> impl Iterator<Item = &ExecutionResult> {
        self.outcomes.iter().filter_map(|o| match o {
            TaskOutcome::Succeeded(result) => Some(result),
            TaskOutcome::Failed { .. } => None,
        })
    }

    /// Failed items with their input index
    pub fn failures(&self) -> impl Iterator<Item = (usize, &RouterError)> {
        self.outcomes.iter().filter_map(|o| match o {
            TaskOutcome::Failed { index, error } => Some((*index, error)),
            TaskOutcome::Succeeded(_) => None,
        })
    }
}

/// Drives tasks one at a time through a router
#[derive(Debug)]
pub struct BatchOrchestrator<'a> {
    router: &'a TaskRouter,
    pacing: Duration,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(router: &'a TaskRouter, pacing: Duration) -> Self {
        Self { router, pacing }
    }

    /// Run every task in order, never aborting on a failed item
    pub async fn run(&self, tasks: &[BatchTask]) -> BatchReport {
        let mut outcomes = Vec::with_capacity(tasks.len());
        let mut summary = BatchSummary {
            attempted: tasks.len(),
            ..BatchSummary::default()
        };
        let mut latency_total: u64 = 0;

        for (index, task) in tasks.iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            match self
                .router
                .execute_task(&task.prompt, &task.context, task.system_prompt.as_deref())
                .await
            {
                Ok(result) => {
                    summary.succeeded += 1;
                    summary.total_cost += result.cost;
                    latency_total += result.latency_ms;
                    outcomes.push(TaskOutcome::Succeeded(result));
                }
                Err(error) => {
                    warn!(
                        index,
                        task_type = %task.context.task_type,
                        error = %error,
                        "Batch task failed, continuing"
                    );
                    outcomes.push(TaskOutcome::Failed { index, error });
                }
            }
        }

        if summary.succeeded > 0 {
            summary.average_latency_ms = latency_total as f64 / summary.succeeded as f64;
        }

        info!(
            succeeded = summary.succeeded,
            attempted = summary.attempted,
            total_cost = summary.total_cost,
            average_latency_ms = summary.average_latency_ms,
            "Batch complete: {}/{} succeeded",
            summary.succeeded,
            summary.attempted
        );

        BatchReport { outcomes, summary }
    }
}
