//! Run handle domain type

use serde::{Deserialize, Serialize};

/// Identifies one execution of an agent
///
/// Issued once by the agent runtime when a job is accepted and never changed
/// afterwards. Only `run_id` is needed to poll the run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunHandle {
    pub run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl RunHandle {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            thread_id: None,
        }
    }
}

impl std::fmt::Display for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.thread_id {
            Some(thread_id) => write!(f, "{} (thread {})", self.run_id, thread_id),
            None => write!(f, "{}", self.run_id),
        }
    }
}
