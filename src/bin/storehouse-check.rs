//! # Storehouse Check
//!
//! Command-line tool that builds the managers described by a configuration
//! file, runs their health checks and tears everything down again.
//! Exits non-zero when any manager reports unhealthy.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indexmap::IndexMap;
use std::process;
use storehouse_core::config::ConfigLoader;
use storehouse_core::logging::init_structured_logging;
use storehouse_core::managers::register_builtin_types;
use storehouse_core::{HealthCheckResult, RegistryEventKind, Storehouse, StorehouseConfig};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "storehouse-check")]
#[command(about = "Health-check the managers of a storehouse configuration")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON); environment overrides still apply
    #[arg(short, long)]
    config: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build every manager and run its health check (default)
    Health,

    /// Load and validate the configuration without building managers
    Validate,

    /// List the registry lifecycle event names
    Events,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_structured_logging();

    let result = match cli.command.as_ref().unwrap_or(&Commands::Health) {
        Commands::Health => run_health(&cli).await,
        Commands::Validate => run_validate(&cli),
        Commands::Events => {
            list_events();
            Ok(true)
        }
    };

    match result {
        Ok(true) => process::exit(0),
        Ok(false) => {
            error!("One or more managers are unhealthy");
            process::exit(1);
        }
        Err(e) => {
            error!("storehouse-check failed: {:#}", e);
            process::exit(2);
        }
    }
}

fn load_config(cli: &Cli) -> Result<StorehouseConfig> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new(),
    };
    loader.load().context("Failed to load storehouse configuration")
}

fn run_validate(cli: &Cli) -> Result<bool> {
    let config = load_config(cli)?;
    println!("✅ Configuration is valid ({} manager(s))", config.managers.len());
    for (name, definition) in &config.managers {
        println!("  {name}: {}", definition.manager_type);
    }
    Ok(true)
}

async fn run_health(cli: &Cli) -> Result<bool> {
    let config = load_config(cli)?;

    let storehouse = Storehouse::with_event_capacity(config.events.channel_capacity);
    register_builtin_types(storehouse.manager_factory());
    storehouse.on(RegistryEventKind::ConnectionCloseError, |event| {
        error!(event = event.name(), "{:?}", event);
    });

    storehouse
        .configure(&config)
        .context("Failed to build managers")?;
    info!(managers = storehouse.len(), "Running health checks");

    let results = storehouse.health_check_all().await;
    let healthy = results.values().all(|result| result.healthy);

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Table => print_table(&results),
    }

    storehouse
        .destroy()
        .await
        .context("Failed to close connections")?;
    Ok(healthy)
}

fn print_table(results: &IndexMap<String, HealthCheckResult>) {
    let width = results.keys().map(String::len).max().unwrap_or(0).max(7);
    println!("{:<width$}  {:<9}  {:>8}  MESSAGE", "MANAGER", "STATUS", "LATENCY");
    for (name, result) in results {
        let status = if result.healthy { "healthy" } else { "unhealthy" };
        let latency = result
            .latency
            .map(|ms| format!("{ms}ms"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<width$}  {:<9}  {:>8}  {}",
            name,
            status,
            latency,
            result.message.as_deref().unwrap_or("")
        );
    }
}

fn list_events() {
    println!("📋 Registry events:");
    for kind in RegistryEventKind::ALL {
        println!("  {kind}");
    }
}
