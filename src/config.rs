//! Console configuration parsed from environment variables.

use std::time::Duration;

use crate::error::ConsoleError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SOURCE_TABLE: &str = "syntasa-saas.ccdp_demo.web_tb_event";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub progress_interval: Duration,
    pub timeouts: HttpTimeouts,
    /// Table name shown as the heading of the source-columns grouping.
    pub source_table: String,
    /// Form-embedded CSRF token; wins over the cookie when present.
    pub csrf_token: Option<String>,
    /// Raw `Cookie` header value searched for `csrftoken`.
    pub csrf_cookie: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            progress_interval: Duration::from_millis(DEFAULT_PROGRESS_INTERVAL_MS),
            timeouts: HttpTimeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            source_table: DEFAULT_SOURCE_TABLE.to_string(),
            csrf_token: None,
            csrf_cookie: None,
        }
    }
}

impl ConsoleConfig {
    /// Build typed console config from environment variables.
    ///
    /// Optional:
    /// - `AUDIENCE_BASE_URL`: default `http://127.0.0.1:8000`
    /// - `AUDIENCE_PROGRESS_INTERVAL_MS`: default 3000
    /// - `AUDIENCE_REQUEST_TIMEOUT_SECS`: default 120
    /// - `AUDIENCE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `AUDIENCE_SOURCE_TABLE`: heading for the source-columns card
    /// - `AUDIENCE_CSRF_TOKEN`: form-embedded token
    /// - `AUDIENCE_CSRF_COOKIE`: raw cookie header for the token fallback
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::ConfigParse`] if a numeric variable is set but
    /// not a valid integer, or the interval is zero.
    pub fn from_env() -> Result<Self, ConsoleError> {
        let base_url = std::env::var("AUDIENCE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let interval_ms = env_parse_u64("AUDIENCE_PROGRESS_INTERVAL_MS", DEFAULT_PROGRESS_INTERVAL_MS)?;
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("AUDIENCE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("AUDIENCE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let source_table =
            std::env::var("AUDIENCE_SOURCE_TABLE").unwrap_or_else(|_| DEFAULT_SOURCE_TABLE.to_string());

        let mut config = Self {
            base_url,
            progress_interval: Duration::from_millis(interval_ms),
            timeouts,
            source_table,
            csrf_token: env_non_empty("AUDIENCE_CSRF_TOKEN"),
            csrf_cookie: env_non_empty("AUDIENCE_CSRF_COOKIE"),
        };
        config.normalize()?;
        Ok(config)
    }

    /// Trim the base URL and reject values the console cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::ConfigParse`] for an empty base URL or a zero
    /// progress interval.
    pub fn normalize(&mut self) -> Result<(), ConsoleError> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            return Err(ConsoleError::ConfigParse("base URL must not be empty".into()));
        }
        if self.progress_interval.is_zero() {
            return Err(ConsoleError::ConfigParse("progress interval must be greater than zero".into()));
        }
        Ok(())
    }
}

fn env_parse_u64(key: &str, default: u64) -> Result<u64, ConsoleError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConsoleError::ConfigParse(format!("{key} must be an integer, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
