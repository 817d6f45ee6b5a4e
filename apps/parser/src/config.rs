use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration loaded from environment variables.
/// Everything is optional: with no environment the parser runs table-only.
#[derive(Debug, Clone)]
pub struct Config {
    /// Enables the LLM header fallback when present.
    pub anthropic_api_key: Option<String>,
    pub header_cache_path: Option<PathBuf>,
    pub classifier_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match optional_env("CLASSIFIER_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("CLASSIFIER_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_CLASSIFIER_TIMEOUT_SECS,
        };

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            header_cache_path: optional_env("HEADER_CACHE_PATH").map(PathBuf::from),
            classifier_timeout: Duration::from_secs(timeout_secs),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Unset and blank variables are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
