//! Configuration module
//!
//! Global CLI settings, turned into per-agent client configuration.

use agentrun_client::AgentConfig;
use anyhow::{Context, Result};
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the agent runtime
    pub base_url: String,
    pub path_prefix: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Optional create-or-update endpoint for run states
    pub save_url: Option<String>,
    /// Web app URL for share links
    pub site_url: String,
}

impl Config {
    /// Client configuration for one agent
    pub fn agent(&self, agent_name: &str) -> Result<AgentConfig> {
        let config = AgentConfig::new(agent_name, &self.base_url)
            .with_path_prefix(&self.path_prefix)
            .with_timeout(self.timeout)
            .with_poll_interval(self.poll_interval);

        config
            .validate()
            .with_context(|| format!("Invalid configuration for agent {}", agent_name))?;

        Ok(config)
    }
}
