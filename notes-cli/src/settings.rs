use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::logging::DEFAULT_LOG_LEVEL;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TOKEN_FILE: &str = ".notes_token";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub token_file: PathBuf,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url =
            non_empty(lookup("NOTES_API_URL")).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token_file: PathBuf = non_empty(lookup("NOTES_TOKEN_FILE"))
            .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string())
            .into();
        let connect_timeout =
            parse_secs(&lookup, "NOTES_CONNECT_TIMEOUT_SECS", 5).map(Duration::from_secs)?;
        let request_timeout =
            parse_secs(&lookup, "NOTES_HTTP_TIMEOUT_SECS", 15).map(Duration::from_secs)?;
        let log_level = non_empty(lookup("LOG_LEVEL"))
            .or_else(|| non_empty(lookup("RUST_LOG")))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            api_url,
            token_file,
            connect_timeout,
            request_timeout,
            log_level,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    let value = non_empty(lookup(key))
        .unwrap_or_else(|| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
