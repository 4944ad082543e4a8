//! Models command - List the model catalog
//!
//! Usage:
//! ```bash
//! basecamp models
//! basecamp models --json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use basecamp_router::{ModelRegistry, ModelRole};

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    /// Output raw JSON (no formatting)
    #[arg(long)]
    json: bool,
}

/// Run the models command
pub fn run(args: ModelsArgs) -> Result<()> {
    let registry = ModelRegistry::initialize();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&registry.all().collect::<Vec<_>>())?);
        return Ok(());
    }

    println!("{}", "🧭 Basecamp Model Catalog".bold().cyan());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Model").fg(Color::Cyan),
            Cell::new("Provider").fg(Color::Cyan),
            Cell::new("$/1K in").fg(Color::Cyan),
            Cell::new("$/1K out").fg(Color::Cyan),
            Cell::new("Latency").fg(Color::Cyan),
            Cell::new("Context").fg(Color::Cyan),
            Cell::new("Roles").fg(Color::Cyan),
            Cell::new("Strengths").fg(Color::Cyan),
        ]);

    for model in registry.all() {
        let roles: Vec<String> = ModelRole::ALL
            .iter()
            .filter(|role| role.model_id() == model.id)
            .map(|role| format!("{:?}", role))
            .collect();

        table.add_row(vec![
            Cell::new(&model.id).fg(Color::Green),
            Cell::new(model.provider.as_str()),
            Cell::new(format!("{:.6}", model.cost_per_1k_input)),
            Cell::new(format!("{:.6}", model.cost_per_1k_output)),
            Cell::new(format!("{}ms", model.expected_latency_ms)),
            Cell::new(model.max_context_length),
            Cell::new(roles.join(", ")).fg(Color::Yellow),
            Cell::new(model.strengths.join(", ")),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "See a routing decision: {}",
        "basecamp route --task-type <type> --priority <priority>".green()
    );

    Ok(())
}
