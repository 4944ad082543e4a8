//! Subcommands and the flags they share

pub mod batch;
pub mod info;
pub mod models;
pub mod route;
pub mod run;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use basecamp_router::{
    Complexity, MockTransport, ModelPerformance, Priority, Provider, RouterSettings, TaskContext,
    TaskRouter, TaskType,
};

/// Flags describing one task
#[derive(Args, Debug, Clone)]
pub struct TaskArgs {
    /// Task type, e.g. email_copy, trip_recommendation (unknown tags route as `other`)
    #[arg(long, short = 't', value_parser = parse_task_type)]
    pub task_type: TaskType,

    /// What to optimize for: speed, quality, cost, balanced
    #[arg(long, short = 'p', value_parser = parse_priority, default_value = "balanced")]
    pub priority: Priority,

    /// simple, medium or complex
    #[arg(long, short = 'c', value_parser = parse_complexity, default_value = "medium")]
    pub complexity: Complexity,

    /// Expected input size in tokens
    #[arg(long)]
    pub input_length: Option<u32>,

    /// Caller identifier, logged only
    #[arg(long)]
    pub caller: Option<String>,
}

impl TaskArgs {
    pub fn context(&self) -> TaskContext {
        let mut ctx = TaskContext::new(self.task_type, self.priority, self.complexity);
        if let Some(tokens) = self.input_length {
            ctx = ctx.with_input_length(tokens);
        }
        if let Some(caller) = &self.caller {
            ctx = ctx.with_caller_id(caller.clone());
        }
        ctx
    }
}

/// Flags controlling how calls are made
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Answer from an in-process echo model instead of the network
    #[arg(long)]
    pub dry_run: bool,

    /// Override the endpoint base URL
    #[arg(long, env = "BASECAMP_LLM_BASE_URL")]
    pub base_url: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ConnectionArgs {
    /// Environment settings with flag overrides applied
    pub fn settings(&self) -> Result<RouterSettings> {
        let mut settings = RouterSettings::from_env().context("Failed to load settings")?;
        if let Some(base_url) = &self.base_url {
            settings = settings.with_base_url(base_url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            settings = settings.with_request_timeout(Duration::from_secs(secs));
        }
        Ok(settings)
    }

    pub fn router(&self) -> Result<TaskRouter> {
        let settings = self.settings()?;
        let builder = TaskRouter::builder().settings(settings);
        let builder = if self.dry_run {
            builder.transport(Arc::new(MockTransport::echo()))
        } else {
            builder
        };
        builder.build().context("Failed to build router")
    }
}

/// Router with no network access, for commands that only route
pub fn offline_router() -> Result<TaskRouter> {
    TaskRouter::builder()
        .settings(RouterSettings::from_env().context("Failed to load settings")?)
        .transport(Arc::new(MockTransport::echo()))
        .build()
        .context("Failed to build router")
}

/// Unknown tags become `TaskType::Other`, the same as in batch files
pub fn parse_task_type(value: &str) -> Result<TaskType, String> {
    if value.is_empty() {
        return Err("task type must not be empty".to_string());
    }
    Ok(TaskType::ALL
        .into_iter()
        .find(|t| t.as_str() == value)
        .unwrap_or(TaskType::Other))
}

pub fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::ALL
        .into_iter()
        .find(|p| p.as_str() == value)
        .ok_or_else(|| unknown("priority", value, &Priority::ALL.map(|p| p.as_str())))
}

pub fn parse_complexity(value: &str) -> Result<Complexity, String> {
    Complexity::ALL
        .into_iter()
        .find(|c| c.as_str() == value)
        .ok_or_else(|| unknown("complexity", value, &Complexity::ALL.map(|c| c.as_str())))
}

fn unknown(kind: &str, value: &str, expected: &[&str]) -> String {
    format!("unknown {kind} '{value}', expected one of: {}", expected.join(", "))
}

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
    table
}

/// Provider spend table, highest first
pub fn cost_table(breakdown: &HashMap<Provider, f64>) -> Table {
    let mut rows: Vec<(&Provider, &f64)> = breakdown.iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(a.1).then(a.0.cmp(b.0)));

    let mut table = styled_table(&["Provider", "Cost (USD)"]);
    for (provider, cost) in rows {
        table.add_row(vec![
            Cell::new(provider.as_str()).fg(Color::Green),
            Cell::new(format!("{:.6}", cost)),
        ]);
    }
    table
}

/// Per-model latency table
pub fn performance_table<'a>(summary: impl IntoIterator<Item = &'a ModelPerformance>) -> Table {
    let mut table = styled_table(&["Model", "Provider", "Requests", "Avg ms", "Min ms", "Max ms"]);
    for perf in summary {
        table.add_row(vec![
            Cell::new(&perf.model_id).fg(Color::Green),
            Cell::new(perf.provider.as_str()),
            Cell::new(perf.requests),
            Cell::new(format!("{:.1}", perf.avg_latency_ms)),
            Cell::new(perf.min_latency_ms),
            Cell::new(perf.max_latency_ms),
        ]);
    }
    table
}
