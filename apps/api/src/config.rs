use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";
const DEFAULT_COMPLETION_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Application configuration loaded from environment variables.
/// Startup fails if the completion credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub completion_url: String,
    pub completion_timeout_secs: u64,
    pub upload_dir: PathBuf,
    /// Prefix for the `pdf_url` values handed back to clients.
    pub public_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openrouter_api_key = lookup("OPENROUTER_API_KEY").unwrap_or_default();
        if openrouter_api_key.trim().is_empty() {
            bail!("Required environment variable 'OPENROUTER_API_KEY' is not set");
        }

        let port = lookup("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        Ok(Config {
            openrouter_api_key,
            model: lookup("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: lookup("MAX_TOKENS")
                .unwrap_or_else(|| "2000".to_string())
                .parse::<u32>()
                .context("MAX_TOKENS must be a positive integer")?,
            completion_url: lookup("COMPLETION_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string()),
            completion_timeout_secs: lookup("COMPLETION_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("COMPLETION_TIMEOUT_SECS must be a whole number of seconds")?,
            upload_dir: PathBuf::from(lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string())),
            public_base_url: lookup("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://127.0.0.1:{port}")),
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
