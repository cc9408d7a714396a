//! Client configuration
//!
//! Values come from the environment with sensible defaults:
//!
//! | Variable | Default |
//! |---|---|
//! | `MIDIAZ_API_BASE_URL` | `http://localhost:8000` |
//! | `MIDIAZ_API_TIMEOUT_SECS` | unset (no timeout) |
//! | `MIDIAZ_EVENTS_STALE_SECS` | `30` |
//! | `MIDIAZ_METRICS_STALE_SECS` | `60` |

use crate::error::{AppError, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const ENV_BASE_URL: &str = "MIDIAZ_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MIDIAZ_API_TIMEOUT_SECS";
pub const ENV_EVENTS_STALE_SECS: &str = "MIDIAZ_EVENTS_STALE_SECS";
pub const ENV_METRICS_STALE_SECS: &str = "MIDIAZ_METRICS_STALE_SECS";

/// Staleness windows for cached resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleTimes {
    /// Event lists and event details
    pub events: Duration,
    /// Aggregated metrics, time series and service status
    pub metrics: Duration,
}

impl Default for StaleTimes {
    fn default() -> Self {
        Self {
            events: Duration::from_secs(30),
            metrics: Duration::from_secs(60),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL without trailing slash
    pub base_url: String,
    /// Optional per-request timeout
    pub timeout: Option<Duration>,
    pub stale_times: StaleTimes,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            stale_times: StaleTimes::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(&base_url)?;
        }

        if let Some(secs) = parse_secs(&lookup, ENV_TIMEOUT_SECS)? {
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_secs(&lookup, ENV_EVENTS_STALE_SECS)? {
            config.stale_times.events = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_secs(&lookup, ENV_METRICS_STALE_SECS)? {
            config.stale_times.metrics = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Replace the base URL after validating it
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Validate a base URL and strip any trailing slash
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|e| AppError::Config(format!("Invalid base URL '{}': {}", trimmed, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::Config(format!(
                "Unsupported URL scheme '{}' in base URL",
                other
            )))
        }
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} must be a whole number of seconds", key))),
        _ => Ok(None),
    }
}
