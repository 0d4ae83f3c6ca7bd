//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use fleet_core::FleetConfig;

use super::{default_config_path, load_config};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a configuration value by dotted key
    Get {
        /// Configuration key (e.g., "extraction.suppression.window")
        key: String,
    },

    /// Set a configuration value by dotted key
    Set {
        /// Configuration key
        key: String,
        /// New value (JSON, or a plain string)
        value: String,
    },

    /// List the note rules in effect
    Rules,

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let default_path = default_config_path();
    match args.command {
        ConfigCommand::Show => show_config(&default_path),
        ConfigCommand::Init(init_args) => init_config(init_args, &default_path),
        ConfigCommand::Get { key } => get_config(&default_path, &key),
        ConfigCommand::Set { key, value } => set_config(&default_path, &key, &value),
        ConfigCommand::Rules => show_rules(&load_config(config_path)?),
        ConfigCommand::Path => show_path(&default_path),
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<FleetConfig> {
    if path.exists() {
        Ok(FleetConfig::from_file(path)?)
    } else {
        Ok(FleetConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!("{} No config file found, showing defaults.", style("ℹ").blue());
    }
    let config = load_or_default(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_config(args: InitArgs, default_path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| default_path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    FleetConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );
    Ok(())
}

/// Walk a dotted key through a JSON value. Numeric segments index arrays.
fn lookup<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    let mut current = value;
    for part in key.split('.') {
        current = match current {
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            Value::Object(map) => map.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

fn lookup_mut<'v>(value: &'v mut Value, key: &str) -> Option<&'v mut Value> {
    let mut current = value;
    for part in key.split('.') {
        current = match current {
            Value::Array(items) => items.get_mut(part.parse::<usize>().ok()?)?,
            Value::Object(map) => map.get_mut(part)?,
            _ => return None,
        };
    }
    Some(current)
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load_or_default(path)?)?;
    let value = lookup(&json, key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_or_default(path)?;

    let parsed_value: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    let target = lookup_mut(&mut json, key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    *target = parsed_value.clone();

    // Round-trip through the typed config so invalid values are rejected
    let config: FleetConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );
    Ok(())
}

fn show_rules(config: &FleetConfig) -> anyhow::Result<()> {
    let extraction = &config.extraction;

    for rule in &extraction.rules {
        let mut line = format!("{:<20} {}", rule.kind.to_string(), rule.labels.join(" | "));
        if rule.amount {
            line.push_str("  [+amount]");
        }
        if let Some(winner) = rule.yields_to {
            line.push_str(&format!("  [yields to {}]", winner));
        }
        println!("{}", line);
    }

    if extraction.suppression.token.trim().is_empty() {
        println!("\nSuppression: off");
    } else {
        println!(
            "\nSuppression: {:?} within {} characters",
            extraction.suppression.token, extraction.suppression.window
        );
    }
    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'fleet config init' to create a configuration file.");
    }
    Ok(())
}
