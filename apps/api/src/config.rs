use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_GENERATION_COMMAND: &str = "ollama";
const DEFAULT_GENERATION_ARGS: &str = "run llama3";
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub embedding_model: String,
    pub generation_command: String,
    pub generation_args: Vec<String>,
    pub generation_timeout: Duration,
    pub max_upload_bytes: usize,
    pub enable_debug_routes: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            host: env_or("HOST", "0.0.0.0"),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            embedding_model: env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            generation_command: env_or("GENERATION_COMMAND", DEFAULT_GENERATION_COMMAND),
            generation_args: split_args(&env_or("GENERATION_ARGS", DEFAULT_GENERATION_ARGS)),
            generation_timeout: Duration::from_secs(
                env_or(
                    "GENERATION_TIMEOUT_SECS",
                    &DEFAULT_GENERATION_TIMEOUT_SECS.to_string(),
                )
                .parse::<u64>()
                .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            enable_debug_routes: parse_flag(&env_or("ENABLE_DEBUG_ROUTES", "false"))
                .context("ENABLE_DEBUG_ROUTES must be true or false")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn split_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(String::from).collect()
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}

#[cfg(test)]
impl Config {
    /// Defaults without touching the process environment.
    pub fn for_tests() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8000,
            rust_log: "debug".to_string(),
            embedding_model: "stub-embedder".to_string(),
            generation_command: "sh".to_string(),
            generation_args: vec!["-c".to_string(), "cat".to_string()],
            generation_timeout: Duration::from_secs(5),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            enable_debug_routes: true,
        }
    }
}
