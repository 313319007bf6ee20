use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use yahoo_client::{YahooConfig, DEFAULT_BASE_URL};

/// Server configuration derived from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub yahoo: YahooConfig,
    /// `LOG_FORMAT=json` switches to structured log lines
    pub json_logs: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or blank keys take their
    /// defaults; values that fail to parse are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(v) => v.parse().with_context(|| format!("invalid PORT: {}", v))?,
            None => 8000,
        };
        let secs = |key: &str, default: u64| -> Result<Duration> {
            match var(key) {
                Some(v) => v
                    .parse()
                    .map(Duration::from_secs)
                    .with_context(|| format!("invalid {}: {}", key, v)),
                None => Ok(Duration::from_secs(default)),
            }
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            yahoo: YahooConfig {
                base_url: var("YAHOO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: secs("YAHOO_TIMEOUT_SECS", 30)?,
                search_timeout: secs("YAHOO_SEARCH_TIMEOUT_SECS", 5)?,
            },
            json_logs: var("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
