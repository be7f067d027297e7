//! Agent connection configuration
//!
//! One [`AgentConfig`] describes how to reach one agent: where the runtime
//! lives, which agent to address, and how patient to be with it.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),
}

/// Connection settings for a single agent
///
/// All timeouts and intervals are configurable to allow tuning per agent
/// (some agents answer status requests much more slowly than others).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Agent name used in API paths (e.g., "college-agent")
    pub agent_name: String,

    /// Base URL of the agent runtime (e.g., "http://localhost:8123")
    pub base_url: String,

    /// Path placed between the base URL and the agent name (e.g., "/api")
    pub path_prefix: String,

    /// Upper bound for each HTTP call
    pub timeout: Duration,

    /// Delay between a status response and the next status request
    pub poll_interval: Duration,
}

impl AgentConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8123";
    pub const DEFAULT_PATH_PREFIX: &'static str = "/api";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

    /// Creates a configuration with default timeout, interval and prefix
    pub fn new(agent_name: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            agent_name: agent_name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            path_prefix: Self::DEFAULT_PATH_PREFIX.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - AGENT_NAME (required)
    /// - AGENT_BASE_URL (optional, default: http://localhost:8123)
    /// - AGENT_PATH_PREFIX (optional, default: /api)
    /// - AGENT_TIMEOUT_MS (optional, default: 30000)
    /// - AGENT_POLL_INTERVAL_MS (optional, default: 10000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let agent_name = lookup("AGENT_NAME").ok_or(ConfigError::Missing("AGENT_NAME"))?;
        let base_url =
            lookup("AGENT_BASE_URL").unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(agent_name, base_url);

        if let Some(prefix) = lookup("AGENT_PATH_PREFIX") {
            config = config.with_path_prefix(prefix);
        }
        if let Some(timeout) = parse_millis(&lookup, "AGENT_TIMEOUT_MS")? {
            config.timeout = timeout;
        }
        if let Some(interval) = parse_millis(&lookup, "AGENT_POLL_INTERVAL_MS")? {
            config.poll_interval = interval;
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Sets the path prefix, normalized to one leading and no trailing slash
    pub fn with_path_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        let trimmed = prefix.as_ref().trim_matches('/');
        self.path_prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        };
        self
    }

    /// URL of the agent's own endpoints, without trailing slash
    pub fn agent_url(&self) -> String {
        format!("{}{}/{}", self.base_url, self.path_prefix, self.agent_name)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_name.trim().is_empty() {
            return Err(ConfigError::Invalid("agent_name cannot be empty".to_string()));
        }

        if self.agent_name.contains('/') {
            return Err(ConfigError::Invalid(
                "agent_name cannot contain '/'".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than 0".to_string()));
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_millis<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
