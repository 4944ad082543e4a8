//! Basecamp CLI - route, run and meter LLM tasks from the terminal
//!
//! # Usage
//!
//! ```bash
//! # Show the model catalog
//! basecamp models
//!
//! # See which model a task would get, without calling it
//! basecamp route --task-type refund_decision --priority quality
//!
//! # Run one task
//! basecamp run --task-type email_copy --priority speed --prompt "Subject line for Patagonia"
//!
//! # Run a JSON batch file offline
//! basecamp batch tasks.json --dry-run --prometheus
//!
//! # Show version and effective settings
//! basecamp info
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{batch, info, models, route, run};

/// Basecamp - deterministic LLM task routing
///
/// Picks one model per task from a fixed catalog, calls it once and
/// tracks what it cost.
#[derive(Parser)]
#[command(
    name = "basecamp",
    version,
    about = "Basecamp CLI - LLM task routing",
    long_about = "Routes each task to a single model by task type, priority and complexity.\n\n\
                  Calls go through an OpenAI-compatible endpoint configured by\n\
                  OPENROUTER_API_KEY and the BASECAMP_* environment variables."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the model catalog
    #[command(name = "models")]
    Models(models::ModelsArgs),

    /// Show the routing decision for a task
    #[command(name = "route")]
    Route(route::RouteArgs),

    /// Execute a single task
    #[command(name = "run")]
    Run(run::RunArgs),

    /// Execute a JSON batch file
    #[command(name = "batch")]
    Batch(batch::BatchArgs),

    /// Show version and settings
    #[command(name = "info")]
    Info(info::InfoArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Models(args) => models::run(args),
        Commands::Route(args) => route::run(args),
        Commands::Run(args) => run::run(args).await,
        Commands::Batch(args) => batch::run(args).await,
        Commands::Info(args) => info::run(args),
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message with an X
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}
