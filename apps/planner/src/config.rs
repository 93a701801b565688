use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_HINT_TIMEOUT_MS: u64 = 3000;

/// Planner configuration loaded from environment variables.
/// Every variable is optional; the defaults run the deterministic path only.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON catalog replacing the built-in layouts.
    pub layout_catalog_path: Option<PathBuf>,
    pub hint_timeout: Duration,
    /// Enables the per-session JSONL audit log when set.
    pub event_log_dir: Option<PathBuf>,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            layout_catalog_path: None,
            hint_timeout: Duration::from_millis(DEFAULT_HINT_TIMEOUT_MS),
            event_log_dir: None,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let hint_timeout_ms = match optional_env("LAYOUT_HINT_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("LAYOUT_HINT_TIMEOUT_MS must be a whole number of milliseconds")?,
            None => DEFAULT_HINT_TIMEOUT_MS,
        };

        Ok(Config {
            layout_catalog_path: optional_env("LAYOUT_CATALOG_PATH").map(PathBuf::from),
            hint_timeout: Duration::from_millis(hint_timeout_ms),
            event_log_dir: optional_env("EVENT_LOG_DIR").map(PathBuf::from),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Reads an env var, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
