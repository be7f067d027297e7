//! Shared router state

use agentrun_client::{JobClient, ReqwestTransport, Transport};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ProxyConfig;

/// One client per served agent, keyed by lowercase agent name
#[derive(Debug, Clone)]
pub struct ProxyState {
    clients: Arc<HashMap<String, JobClient>>,
}

impl ProxyState {
    /// Clients sharing one reqwest connection pool
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: &ProxyConfig, transport: Arc<dyn Transport>) -> Self {
        let clients = config
            .agents
            .iter()
            .map(|name| {
                let name = name.to_lowercase();
                let client = JobClient::with_transport(config.agent(&name), Arc::clone(&transport));
                (name, client)
            })
            .collect();

        Self {
            clients: Arc::new(clients),
        }
    }

    pub fn client(&self, agent_name: &str) -> Option<&JobClient> {
        self.clients.get(&agent_name.to_lowercase())
    }

    pub fn agent_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clients.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
