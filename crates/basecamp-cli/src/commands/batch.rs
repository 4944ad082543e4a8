//! Batch command - Execute a JSON file of tasks in order
//!
//! The file holds an array of `{"prompt", "context", "system_prompt"?}`
//! objects, where `context` uses camelCase keys:
//!
//! ```json
//! [
//!   {
//!     "prompt": "Score this lead",
//!     "context": {"taskType": "lead_qualification", "priority": "quality", "complexity": "medium"}
//!   }
//! ]
//! ```
//!
//! Usage:
//! ```bash
//! basecamp batch tasks.json
//! basecamp batch tasks.json --dry-run --prometheus
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use tracing::debug;

use basecamp_router::{BatchOrchestrator, BatchTask, TaskOutcome};

use super::{cost_table, performance_table, ConnectionArgs};
use crate::{print_error, print_success, print_warning};

/// Arguments for the batch command
#[derive(Args)]
pub struct BatchArgs {
    /// Path to a JSON array of tasks
    file: PathBuf,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Override the delay between tasks in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Also print metrics in Prometheus text format
    #[arg(long)]
    prometheus: bool,
}

/// Run the batch command
pub async fn run(args: BatchArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let tasks: Vec<BatchTask> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid batch file {}", args.file.display()))?;

    let router = args.connection.router()?;
    let pacing = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(router.settings().batch_pacing);
    debug!(
        tasks = tasks.len(),
        pacing_ms = pacing.as_millis() as u64,
        dry_run = args.connection.dry_run,
        "Loaded batch file"
    );

    if args.connection.dry_run {
        print_warning("Dry run: responses come from a local echo model");
    }
    println!(
        "{} Running {} task(s) from {}...",
        "⚙".blue(),
        tasks.len(),
        args.file.display().to_string().green()
    );
    println!();

    let report = BatchOrchestrator::new(&router, pacing).run(&tasks).await;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Task").fg(Color::Cyan),
            Cell::new("Model").fg(Color::Cyan),
            Cell::new("Tokens").fg(Color::Cyan),
            Cell::new("Cost").fg(Color::Cyan),
            Cell::new("Outcome").fg(Color::Cyan),
        ]);

    for (index, (task, outcome)) in tasks.iter().zip(&report.outcomes).enumerate() {
        let row = match outcome {
            TaskOutcome::Succeeded(result) => vec![
                Cell::new(index),
                Cell::new(task.context.task_type.as_str()),
                Cell::new(&result.model_id).fg(Color::Green),
                Cell::new(result.total_tokens),
                Cell::new(format!("{:.6}", result.cost)),
                Cell::new("ok").fg(Color::Green),
            ],
            TaskOutcome::Failed { error, .. } => vec![
                Cell::new(index),
                Cell::new(task.context.task_type.as_str()),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(error.to_string()).fg(Color::Red),
            ],
        };
        table.add_row(row);
    }
    println!("{table}");
    println!();

    let summary = &report.summary;
    let line = format!(
        "{}/{} succeeded, total ${:.6}, avg latency {:.1}ms",
        summary.succeeded, summary.attempted, summary.total_cost, summary.average_latency_ms
    );
    if summary.succeeded == summary.attempted {
        print_success(&line);
    } else {
        print_error(&line);
    }
    println!();

    println!("{}", "Model performance:".bold());
    println!("{}", performance_table(router.performance_summary().values()));
    println!();
    println!("{}", "Spend by provider:".bold());
    println!("{}", cost_table(&router.cost_breakdown()));

    if args.prometheus {
        println!();
        print!("{}", router.observability().to_prometheus());
    }

    Ok(())
}
