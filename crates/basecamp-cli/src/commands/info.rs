//! Info command - Show version and effective settings
//!
//! Usage:
//! ```bash
//! basecamp info
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use basecamp_router::config::{
    ENV_API_KEY, ENV_APP_NAME, ENV_BASE_URL, ENV_BATCH_DELAY_MS, ENV_DEFAULT_INPUT_TOKENS,
    ENV_SITE_URL, ENV_TIMEOUT_SECS,
};
use basecamp_router::{ModelRegistry, RouterSettings};

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs;

/// Run the info command
pub fn run(_args: InfoArgs) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    println!("{}", "Basecamp - LLM Task Router".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!();

    println!("{}", "Version Information:".bold());
    println!("  {} {}", "CLI Version:".dimmed(), version.green());
    println!(
        "  {} {} models",
        "Catalog:".dimmed(),
        ModelRegistry::initialize().len().to_string().green()
    );
    println!();

    println!("{}", "Configuration:".bold());
    match RouterSettings::from_env() {
        Ok(settings) => {
            let key = if settings.api_key.is_some() {
                "set".green()
            } else {
                "missing (calls will fail)".red()
            };
            println!("  {} {}", format!("{ENV_API_KEY}:").dimmed(), key);
            println!("  {} {}", format!("{ENV_BASE_URL}:").dimmed(), settings.base_url);
            println!("  {} {}", format!("{ENV_SITE_URL}:").dimmed(), settings.site_url);
            println!("  {} {}", format!("{ENV_APP_NAME}:").dimmed(), settings.app_name);
            println!(
                "  {} {}s",
                format!("{ENV_TIMEOUT_SECS}:").dimmed(),
                settings.request_timeout.as_secs()
            );
            println!(
                "  {} {}ms",
                format!("{ENV_BATCH_DELAY_MS}:").dimmed(),
                settings.batch_pacing.as_millis()
            );
            println!(
                "  {} {}",
                format!("{ENV_DEFAULT_INPUT_TOKENS}:").dimmed(),
                settings.default_input_length
            );
        }
        Err(err) => {
            println!("  {} {}", "✗".red(), err);
        }
    }
    println!();

    println!("{}", "Behaviour:".bold());
    println!("  {} One model per task, chosen deterministically", "✓".green());
    println!("  {} Single attempt, no retries or fallback", "✓".green());
    println!("  {} Cost tracked per provider, latency per model", "✓".green());
    println!();

    Ok(())
}
