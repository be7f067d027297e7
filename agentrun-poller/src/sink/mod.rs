//! Persistence sinks
//!
//! A sink receives every state the controller accepts, for example to keep a
//! record of runs in a database. Saving is fire-and-forget: states are queued
//! to a background task, written one at a time in acceptance order, and a
//! failed write is logged and otherwise ignored. Polling never waits on a
//! sink.

mod http;
mod memory;

pub use http::HttpStateSink;
pub use memory::MemoryStateSink;

use agentrun_client::AgentState;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Errors a sink may report
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("sink rejected state (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("{0}")]
    Other(String),
}

/// Receives accepted agent states
#[async_trait]
pub trait StateSink: Send + Sync {
    async fn save(&self, state: &AgentState) -> Result<(), SinkError>;
}

/// Serializes saves to one sink on a background task
///
/// The task is spawned on first use, so a controller can be built outside a
/// runtime. [`SinkWorker::flush`] closes the queue and waits for the task to
/// write everything submitted so far; the next submit starts a new task.
pub(crate) struct SinkWorker {
    sink: Arc<dyn StateSink>,
    queue: Mutex<Option<Queue>>,
}

struct Queue {
    tx: mpsc::UnboundedSender<AgentState>,
    task: JoinHandle<()>,
}

impl SinkWorker {
    pub(crate) fn new(sink: Arc<dyn StateSink>) -> Self {
        Self {
            sink,
            queue: Mutex::new(None),
        }
    }

    pub(crate) fn submit(&self, state: AgentState) {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);

        let current = queue.get_or_insert_with(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            let task = tokio::spawn(drain(Arc::clone(&self.sink), rx));
            Queue { tx, task }
        });

        if current.tx.send(state).is_err() {
            warn!("Sink task is gone, dropping state");
            *queue = None;
        }
    }

    /// Waits until every submitted state has been handed to the sink
    pub(crate) async fn flush(&self) {
        let queue = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(Queue { tx, task }) = queue else {
            return;
        };

        drop(tx);
        if let Err(e) = task.await {
            warn!("Sink task ended abnormally: {}", e);
        }
    }
}

async fn drain(sink: Arc<dyn StateSink>, mut rx: mpsc::UnboundedReceiver<AgentState>) {
    while let Some(state) = rx.recv().await {
        match sink.save(&state).await {
            Ok(()) => debug!("Saved state of run {} ({})", state.run_id, state.status),
            Err(e) => warn!("Failed to save state of run {}: {}", state.run_id, e),
        }
    }
}
