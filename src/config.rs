//! Application configuration loaded from a JSON file with environment overrides.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## File
//!
//! The file path comes from `CONFIG_PATH` (default: `./config.json`):
//!
//! ```json
//! {
//!   "log_level": "info",
//!   "integration_token": "secret_...",
//!   "lazy_load": false,
//!   "forwarded_databases": [
//!     { "name": "tasks", "database_id": "0f1e...", "forward_column_name": "slug" }
//!   ]
//! }
//! ```
//!
//! ## Required Keys
//!
//! - `integration_token` - Notion integration token
//! - `forwarded_databases` - List of databases (each with `name`, `database_id`,
//!   `forward_column_name`)
//!
//! ## Optional Keys
//!
//! - `log_level` - `debug`, `info`, `warn` or `error` (default: `info`)
//! - `lazy_load` - Skip the startup scan and fill indexes on demand (default: `false`)
//! - `listen_addr` - Bind address (default: `0.0.0.0:3000`)
//! - `log_format` - `text` or `json` (default: `text`)
//! - `notion_base_url` - Notion API root (default: `https://api.notion.com`)
//! - `upstream_timeout_seconds` - Timeout per Notion request (default: 30)
//!
//! ## Environment Overrides
//!
//! - `LISTEN` - Replaces `listen_addr`
//! - `LOG_FORMAT` - Replaces `log_format`
//! - `RUST_LOG` - Takes precedence over `log_level` when set

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::{env, fs};
use url::Url;
use validator::Validate;

use crate::domain::entities::ForwardedDatabase;
use crate::infrastructure::notion::DEFAULT_BASE_URL;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

const LOG_LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];

/// One forwarded database as written in the configuration file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForwardedDatabaseConfig {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "database_id must not be empty"))]
    pub database_id: String,
    #[validate(length(min = 1, message = "forward_column_name must not be empty"))]
    pub forward_column_name: String,
}

impl From<ForwardedDatabaseConfig> for ForwardedDatabase {
    fn from(config: ForwardedDatabaseConfig) -> Self {
        ForwardedDatabase::new(config.name, config.database_id, config.forward_column_name)
    }
}

/// Service configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[validate(length(min = 1, message = "integration_token must not be empty"))]
    pub integration_token: String,
    /// When true, indexes start empty and are filled on first lookup.
    #[serde(default)]
    pub lazy_load: bool,
    #[validate(nested)]
    pub forwarded_databases: Vec<ForwardedDatabaseConfig>,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_notion_base_url")]
    pub notion_base_url: String,
    #[serde(default = "default_upstream_timeout_seconds")]
    pub upstream_timeout_seconds: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_notion_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_upstream_timeout_seconds() -> u64 {
    30
}

impl Config {
    /// Parses configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a required key is missing.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse configuration")
    }

    /// Reads and parses the configuration file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Applies `LISTEN` and `LOG_FORMAT` overrides from the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(listen) = env::var("LISTEN") {
            self.listen_addr = listen;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.log_format = format;
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a required string is empty
    /// - `log_level` is not one of `debug`, `info`, `warn`, `error`
    /// - `log_format` is not `text` or `json`
    /// - two databases share a name
    /// - `listen_addr` or `notion_base_url` is malformed
    /// - `upstream_timeout_seconds` is 0
    pub fn ensure_valid(&self) -> Result<()> {
        Validate::validate(self).context("Invalid configuration")?;

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            anyhow::bail!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "log_format must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        let mut names = HashSet::new();
        for database in &self.forwarded_databases {
            if !names.insert(database.name.as_str()) {
                anyhow::bail!("Duplicate forwarded database name '{}'", database.name);
            }
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "listen_addr must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        Url::parse(&self.notion_base_url)
            .with_context(|| format!("notion_base_url is not a valid URL: '{}'", self.notion_base_url))?;

        if self.upstream_timeout_seconds == 0 {
            anyhow::bail!("upstream_timeout_seconds must be greater than 0");
        }

        Ok(())
    }

    /// Log level as a tracing filter directive.
    pub fn log_directive(&self) -> String {
        self.log_level.to_lowercase()
    }

    /// Forwarded databases as domain entities, in file order.
    pub fn databases(&self) -> Vec<ForwardedDatabase> {
        self.forwarded_databases
            .iter()
            .cloned()
            .map(ForwardedDatabase::from)
            .collect()
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Notion API: {}", self.notion_base_url);
        tracing::info!("  Integration token: {}", mask_secret(&self.integration_token));
        tracing::info!("  Upstream timeout: {}s", self.upstream_timeout_seconds);
        tracing::info!("  Lazy load: {}", self.lazy_load);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        for database in &self.forwarded_databases {
            tracing::info!(
                "  Database '{}': {} (forward column '{}')",
                database.name,
                database.database_id,
                database.forward_column_name
            );
        }
    }
}

/// Masks a secret for logging, keeping at most its first four characters.
///
/// `secret_abcdef` → `secr***`
fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if visible.chars().count() == secret.chars().count() {
        return "***".to_string();
    }
    format!("{}***", visible)
}

/// Path of the configuration file, from `CONFIG_PATH` or the default.
pub fn config_path() -> String {
    env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Loads, overrides and validates configuration from `path`.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load(path: impl AsRef<Path>) -> Result<Config> {
    let mut config = Config::from_file(path)?;
    config.apply_env_overrides();
    config.ensure_valid()?;
    Ok(config)
}
