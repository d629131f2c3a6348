//! CLI administration tool for notion-forwarder.
//!
//! Runs the same lookups and scans as the server against the configured
//! Notion databases, without starting HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Validate the configuration file
//! cargo run --bin admin -- check
//!
//! # Scan every database and report key counts
//! cargo run --bin admin -- populate
//!
//! # Print every key of one database
//! cargo run --bin admin -- dump tasks
//!
//! # Resolve a single key
//! cargo run --bin admin -- lookup tasks abc
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG_PATH`: configuration file (default: `./config.json`), or `--config`

use notion_forwarder::application::services::ForwardingService;
use notion_forwarder::config::{self, Config};
use notion_forwarder::server::build_service;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for managing notion-forwarder.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, env = "CONFIG_PATH", default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print a summary
    Check,

    /// Scan every configured database
    Populate,

    /// Scan one database and print all of its keys
    Dump {
        /// Configured database name
        database: String,
    },

    /// Resolve a key the way `/r/{database}/{key}` does
    Lookup {
        /// Configured database name
        database: String,
        /// Forwarding key
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    match cli.command {
        Commands::Check => check(&config),
        Commands::Populate => populate(&build_service(&config)?).await?,
        Commands::Dump { database } => dump(&build_service(&config)?, &database).await?,
        Commands::Lookup { database, key } => {
            lookup(&build_service(&config)?, &database, &key).await?
        }
    }

    Ok(())
}

/// Prints the validated configuration.
fn check(config: &Config) {
    println!("{}", "✓ Configuration is valid".green().bold());
    println!();
    println!("  {}: {}", "Listen".bright_black(), config.listen_addr);
    println!("  {}: {}", "Notion API".bright_black(), config.notion_base_url);
    println!("  {}: {}", "Lazy load".bright_black(), config.lazy_load);
    println!("  {}: {}", "Log level".bright_black(), config.log_level);
    println!();

    if config.forwarded_databases.is_empty() {
        println!("{}", "No forwarded databases configured".yellow());
        return;
    }

    println!("{}", "Forwarded databases:".bright_blue().bold());
    for database in &config.forwarded_databases {
        println!(
            "  {} {} (column {})",
            database.name.bold(),
            database.database_id.bright_black(),
            database.forward_column_name.cyan()
        );
    }
}

/// Runs a full scan of every database, stopping at the first failure.
async fn populate(service: &ForwardingService) -> Result<()> {
    println!("{}", "Populating forwarded databases".bright_blue().bold());

    service
        .populate_all()
        .await
        .context("Population failed")?;

    for status in service.status().await {
        println!(
            "  {} {} {}",
            "✓".green(),
            status.name.bold(),
            format!("({} keys)", status.entries).bright_black()
        );
    }

    Ok(())
}

/// Scans one database and prints every key with its URLs.
async fn dump(service: &ForwardingService, database: &str) -> Result<()> {
    let keys = service
        .populate(database)
        .await
        .with_context(|| format!("Failed to scan database '{}'", database))?;

    println!(
        "{} {}",
        database.bright_blue().bold(),
        format!("({} keys)", keys).bright_black()
    );

    for (key, urls) in service.entries(database).await? {
        let marker = if urls.len() > 1 {
            format!("[{}]", urls.len()).yellow()
        } else {
            "".normal()
        };
        println!("  {} {}", key.bold(), marker);
        for url in urls {
            println!("    → {}", url.cyan());
        }
    }

    Ok(())
}

/// Resolves one key through the cache-then-source path.
async fn lookup(service: &ForwardingService, database: &str, key: &str) -> Result<()> {
    match service.lookup(database, key).await {
        Ok(urls) => {
            let outcome = if urls.len() == 1 {
                "302 redirect".green()
            } else {
                "300 multiple choices".yellow()
            };
            println!("{} {}", key.bold(), outcome);
            for url in urls {
                println!("  → {}", url.cyan());
            }
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("{} {}", "✗".red(), e.to_string().red());
            Ok(())
        }
        Err(e) => Err(e).context("Lookup failed"),
    }
}
