//! Agent state envelope
//!
//! Every start and status response from the agent runtime is an [`AgentState`].
//! Only `current_state` depends on which agent produced it; the rest of the
//! envelope is shared by all agents.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::domain::run::RunHandle;

/// Status of a run as reported by the agent runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    #[serde(alias = "running")]
    Running,
    #[serde(alias = "completed")]
    Completed,
    #[serde(alias = "error")]
    Error,
}

impl AgentStatus {
    /// Whether no further progress can be observed for the run
    pub fn is_terminal(self) -> bool {
        !matches!(self, AgentStatus::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Running => "RUNNING",
            AgentStatus::Completed => "COMPLETED",
            AgentStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State envelope returned by the agent runtime
///
/// `S` is the shape of `current_state`. It defaults to an untyped JSON value;
/// use [`AgentState::decode`] to get a typed view for a specific agent.
///
/// Fields this type does not know about are kept in `extra` so that a state
/// can be forwarded or stored without losing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState<S = JsonValue> {
    pub run_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,

    pub status: AgentStatus,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::serde_ext::timestamp"
    )]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::serde_ext::timestamp"
    )]
    pub last_update: Option<DateTime<Utc>>,

    /// Agent-specific payload, opaque to the client
    #[serde(default)]
    pub current_state: S,

    /// Human-readable progress messages, oldest first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updates: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl<S> AgentState<S> {
    pub fn handle(&self) -> RunHandle {
        RunHandle {
            run_id: self.run_id.clone(),
            thread_id: self.thread_id.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == AgentStatus::Running
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The agent ran and reported a failure of its own
    ///
    /// This is an outcome, not a transport error: partial `current_state` and
    /// `status_updates` are still meaningful.
    pub fn is_remote_error(&self) -> bool {
        self.status == AgentStatus::Error
    }

    /// Progress messages, empty when the agent does not report any
    pub fn updates(&self) -> &[String] {
        self.status_updates.as_deref().unwrap_or(&[])
    }
}

impl AgentState<JsonValue> {
    /// Decodes `current_state` into an agent-specific shape
    ///
    /// A missing or null payload decodes as an empty object, so shapes whose
    /// fields all have defaults accept early, still-empty states.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<AgentState<T>, serde_json::Error> {
        let payload = match &self.current_state {
            JsonValue::Null => JsonValue::Object(Map::new()),
            other => other.clone(),
        };

        Ok(AgentState {
            run_id: self.run_id.clone(),
            thread_id: self.thread_id.clone(),
            status: self.status,
            start_time: self.start_time,
            last_update: self.last_update,
            current_state: serde_json::from_value(payload)?,
            status_updates: self.status_updates.clone(),
            agent_name: self.agent_name.clone(),
            extra: self.extra.clone(),
        })
    }
}
