//! Runtime configuration from the environment.

use std::time::Duration;
use thiserror::Error;
use trade_dash_data::{FetchError, MetricsEndpoint, Url};

pub const ENV_ENDPOINT: &str = "TRADE_DASH_ENDPOINT";
pub const ENV_BASE_URL: &str = "TRADE_DASH_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "TRADE_DASH_TIMEOUT_SECS";
pub const ENV_REFRESH_SECS: &str = "TRADE_DASH_REFRESH_SECS";
pub const ENV_LOG_JSON: &str = "TRADE_DASH_LOG_JSON";

const DEFAULT_ENDPOINT: &str = "./metrics.json";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key}: expected a whole number of seconds, got '{value}'")]
    InvalidSeconds { key: &'static str, value: String },

    #[error("{key}: expected true or false, got '{value}'")]
    InvalidBool { key: &'static str, value: String },

    #[error("{key}: invalid url '{value}': {reason}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug)]
pub struct DashboardConfig {
    /// Metrics document location; relative references resolve against
    /// `base_url`.
    pub endpoint: String,

    /// Base for relative endpoints.
    pub base_url: Url,

    /// Per-request timeout. `None` waits for as long as the server takes.
    pub request_timeout: Option<Duration>,

    /// Auto-refresh period. `None` means refresh only on request.
    pub auto_refresh: Option<Duration>,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl DashboardConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = get(ENV_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let base_url = parse_url(
            ENV_BASE_URL,
            &get(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?;

        Ok(Self {
            endpoint,
            base_url,
            request_timeout: get(ENV_TIMEOUT_SECS)
                .map(|v| parse_seconds(ENV_TIMEOUT_SECS, &v))
                .transpose()?,
            auto_refresh: get(ENV_REFRESH_SECS)
                .map(|v| parse_seconds(ENV_REFRESH_SECS, &v))
                .transpose()?,
            log_json: get(ENV_LOG_JSON)
                .map(|v| parse_bool(ENV_LOG_JSON, &v))
                .transpose()?
                .unwrap_or(false),
        })
    }

    /// Resolves the configured endpoint.
    pub fn metrics_endpoint(&self) -> Result<MetricsEndpoint, FetchError> {
        MetricsEndpoint::parse(&self.endpoint, &self.base_url)
    }
}

pub fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_seconds(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidSeconds {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}
