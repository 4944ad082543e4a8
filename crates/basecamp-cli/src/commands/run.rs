//! Run command - Execute a single task
//!
//! Usage:
//! ```bash
//! basecamp run -t email_copy -p speed --prompt "Subject line for our Patagonia trek"
//! basecamp run -t refund_decision -p quality -c complex --prompt "..." --system "Answer in JSON"
//! basecamp run -t chat --prompt "hello" --dry-run
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::{cost_table, ConnectionArgs, TaskArgs};
use crate::print_warning;

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    task: TaskArgs,

    /// User prompt
    #[arg(long)]
    prompt: String,

    /// System prompt (defaults to a generic assistant prompt)
    #[arg(long)]
    system: Option<String>,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Output raw JSON (no formatting)
    #[arg(long)]
    raw: bool,
}

/// Run the run command
pub async fn run(args: RunArgs) -> Result<()> {
    let router = args.connection.router()?;
    let ctx = args.task.context();

    if !args.raw {
        if args.connection.dry_run {
            print_warning("Dry run: responses come from a local echo model");
        }
        let decision = router.route_task(&ctx);
        println!(
            "{} Routing {} to '{}'...",
            "⚙".blue(),
            ctx.task_type.to_string().cyan(),
            decision.model.id.green()
        );
        println!("  {} {}", "Reason:".dimmed(), decision.reason);
        println!();
    }

    let result = router
        .execute_task(&args.prompt, &ctx, args.system.as_deref())
        .await
        .with_context(|| format!("Task '{}' failed", ctx.task_type))?;

    if args.raw {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", "Result:".bold());
    println!("{}", result.content);
    println!();
    println!("{} {}", "Request:".dimmed(), result.request_id);
    println!(
        "{} {} in / {} out",
        "Tokens:".dimmed(),
        result.input_tokens,
        result.output_tokens
    );
    println!("{} ${:.6}", "Cost:".dimmed(), result.cost);
    println!("{} {}ms", "Latency:".dimmed(), result.latency_ms);
    println!();
    println!("{}", "Spend by provider:".bold());
    println!("{}", cost_table(&router.cost_breakdown()));

    Ok(())
}
