//! Proxy configuration
//!
//! Loaded from environment variables with sensible defaults.

use agentrun_client::{AgentConfig, ConfigError};
use agentrun_core::agents::AgentKind;
use std::net::SocketAddr;
use std::time::Duration;

/// Proxy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Base URL of the upstream agent runtime
    pub base_url: String,

    /// Path prefix of the upstream agent routes
    pub path_prefix: String,

    /// Agents served by this proxy
    pub agents: Vec<String>,

    /// Upper bound for each upstream call
    pub timeout: Duration,
}

impl ProxyConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:3000";

    /// Creates a configuration serving every known agent
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            bind_addr: Self::DEFAULT_BIND_ADDR.to_string(),
            base_url: base_url.into(),
            path_prefix: AgentConfig::DEFAULT_PATH_PREFIX.to_string(),
            agents: AgentKind::ALL.iter().map(|kind| kind.name().to_string()).collect(),
            timeout: AgentConfig::DEFAULT_TIMEOUT,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PROXY_BIND_ADDR (optional, default: 0.0.0.0:3000)
    /// - AGENT_BASE_URL (optional, default: http://localhost:8123)
    /// - AGENT_PATH_PREFIX (optional, default: /api)
    /// - PROXY_AGENTS (optional, comma-separated, default: every known agent)
    /// - AGENT_TIMEOUT_MS (optional, default: 30000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("AGENT_BASE_URL")
            .unwrap_or_else(|| AgentConfig::DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);

        if let Some(addr) = lookup("PROXY_BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Some(prefix) = lookup("AGENT_PATH_PREFIX") {
            config.path_prefix = prefix;
        }

        if let Some(agents) = lookup("PROXY_AGENTS") {
            config.agents = agents
                .split(',')
                .map(|name| name.trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect();
        }

        if let Some(value) = lookup("AGENT_TIMEOUT_MS") {
            let ms = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "AGENT_TIMEOUT_MS",
                    value: value.clone(),
                })?;
            config.timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Client configuration for one upstream agent
    pub fn agent(&self, agent_name: &str) -> AgentConfig {
        AgentConfig::new(agent_name, &self.base_url)
            .with_path_prefix(&self.path_prefix)
            .with_timeout(self.timeout)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                key: "PROXY_BIND_ADDR",
                value: self.bind_addr.clone(),
            });
        }

        if self.agents.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one agent must be configured".to_string(),
            ));
        }

        for name in &self.agents {
            self.agent(name).validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.base_url, "http://localhost:8123");
        assert_eq!(config.agents.len(), AgentKind::ALL.len());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let config = ProxyConfig::from_lookup(lookup(&[
            ("PROXY_BIND_ADDR", "127.0.0.1:4000"),
            ("AGENT_BASE_URL", "https://agents.example.com"),
            ("PROXY_AGENTS", "College-Agent, marketing-agent,,"),
            ("AGENT_TIMEOUT_MS", "45000"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:4000");
        assert_eq!(config.agents, vec!["college-agent", "marketing-agent"]);
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(
            config.agent("college-agent").agent_url(),
            "https://agents.example.com/api/college-agent"
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(ProxyConfig::from_lookup(lookup(&[("AGENT_TIMEOUT_MS", "soon")])).is_err());

        let config = ProxyConfig::from_lookup(lookup(&[("PROXY_BIND_ADDR", "nowhere")])).unwrap();
        assert!(config.validate().is_err());

        let config = ProxyConfig::from_lookup(lookup(&[("PROXY_AGENTS", " , ")])).unwrap();
        assert!(config.validate().is_err());

        let config = ProxyConfig::from_lookup(lookup(&[("AGENT_BASE_URL", "ftp://x")])).unwrap();
        assert!(config.validate().is_err());
    }
}
