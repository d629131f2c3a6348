//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Level used before configuration is available.
pub const FALLBACK_DIRECTIVE: &str = "info";

/// Builds the filter; `RUST_LOG` wins over `default_directive` when set.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Installs the global subscriber in `text` or `json` format.
///
/// Does nothing if a subscriber is already installed.
pub fn init(default_directive: &str, format: &str) {
    let filter = env_filter(default_directive);

    let result = if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Tracing subscriber already installed: {}", e);
    }
}
