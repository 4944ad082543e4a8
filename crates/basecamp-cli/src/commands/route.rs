//! Route command - Show which model a task would get
//!
//! Usage:
//! ```bash
//! basecamp route --task-type trip_recommendation --priority quality
//! basecamp route -t chat -p balanced -c simple --json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{offline_router, TaskArgs};

/// Arguments for the route command
#[derive(Args)]
pub struct RouteArgs {
    #[command(flatten)]
    task: TaskArgs,

    /// Output raw JSON (no formatting)
    #[arg(long)]
    json: bool,
}

/// Run the route command. No network I/O.
pub fn run(args: RouteArgs) -> Result<()> {
    let router = offline_router()?;
    let ctx = args.task.context();
    let decision = router.route_task(&ctx);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }

    println!(
        "{} {} / {} / {}",
        "Task:".bold(),
        ctx.task_type.to_string().cyan(),
        ctx.priority,
        ctx.complexity
    );
    println!();
    println!("  {} {}", "Model:".dimmed(), decision.model.id.green().bold());
    println!("  {} {}", "Provider:".dimmed(), decision.model.provider);
    println!("  {} {}", "Reason:".dimmed(), decision.reason);
    println!(
        "  {} ${:.6} (input only)",
        "Estimated cost:".dimmed(),
        decision.estimated_cost
    );
    println!(
        "  {} {}ms",
        "Expected latency:".dimmed(),
        decision.estimated_latency_ms
    );

    Ok(())
}
