//! In-memory sink

use agentrun_client::AgentState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{SinkError, StateSink};

/// Keeps the latest state of each run, keyed by run id
#[derive(Debug, Default)]
pub struct MemoryStateSink {
    states: Mutex<HashMap<String, AgentState>>,
    saves: Mutex<usize>,
}

impl MemoryStateSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, run_id: &str) -> Option<AgentState> {
        self.states().get(run_id).cloned()
    }

    /// Number of runs stored
    pub fn len(&self) -> usize {
        self.states().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states().is_empty()
    }

    /// Number of save calls received
    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn states(&self) -> MutexGuard<'_, HashMap<String, AgentState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StateSink for MemoryStateSink {
    async fn save(&self, state: &AgentState) -> Result<(), SinkError> {
        self.states().insert(state.run_id.clone(), state.clone());
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}
