//! Rules command - inspect or initialize field rule configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use docglean_core::fields::invoice_rules;
use docglean_core::DocgleanConfig;

use super::{build_registry, load_config};

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    command: Option<RulesCommand>,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// Show the active field rules (default)
    Show {
        /// Show the generic PII pattern set instead
        #[arg(long)]
        pii: bool,
    },

    /// Write a starter config file seeded with the built-in invoice rules
    Init(InitArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Output path for the configuration file
    #[arg(short, long, default_value = "docglean.json")]
    output: PathBuf,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: RulesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        Some(RulesCommand::Init(init_args)) => init_rules(init_args),
        Some(RulesCommand::Show { pii }) => show_rules(config_path, pii),
        None => show_rules(config_path, false),
    }
}

fn show_rules(config_path: Option<&str>, pii: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = build_registry(&config, None, pii)?;

    println!("{}", serde_json::to_string_pretty(&registry.rules())?);

    Ok(())
}

fn init_rules(args: InitArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            args.output.display()
        );
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let config = DocgleanConfig {
        fields: Some(invoice_rules()),
        ..DocgleanConfig::default()
    };
    config.save(&args.output)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        args.output.display()
    );

    Ok(())
}
