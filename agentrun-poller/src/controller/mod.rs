//! Polling controller
//!
//! [`PollingController`] owns the life of one run at a time:
//!
//! ```text
//! Idle --start--> Starting --RUNNING--> Polling --COMPLETED--> Completed
//!                    |                     |  \---ERROR / poll failure--> Failed
//!                    \--start failed--> Idle
//! Idle --attach--> Polling
//! any --cancel--> Idle
//! ```
//!
//! Observers call [`PollingController::subscribe`] and receive every phase
//! transition, every accepted state, and every transport error. A remote
//! `ERROR` status is delivered as a state, never as an error.

mod machine;
mod poller;

pub use machine::{Phase, PollEvent};

use agentrun_client::{AgentState, JobClient, JobInput, RunHandle};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use crate::error::ControllerError;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::sink::{SinkWorker, StateSink};
use machine::{Machine, Verdict};
use poller::PollTask;

/// Builder for [`PollingController`]
pub struct ControllerBuilder {
    client: JobClient,
    interval: Duration,
    scheduler: Arc<dyn Scheduler>,
    sink: Option<Arc<dyn StateSink>>,
}

impl ControllerBuilder {
    /// Overrides the poll interval taken from the client configuration
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Every accepted state is also handed to this sink
    pub fn sink(mut self, sink: Arc<dyn StateSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> PollingController {
        PollingController {
            inner: Arc::new(Inner {
                client: self.client,
                interval: self.interval,
                scheduler: self.scheduler,
                sink: self.sink.map(SinkWorker::new),
                machine: Mutex::new(Machine::new()),
            }),
        }
    }
}

pub(crate) struct Inner {
    client: JobClient,
    interval: Duration,
    scheduler: Arc<dyn Scheduler>,
    sink: Option<SinkWorker>,
    machine: Mutex<Machine>,
}

impl Inner {
    fn machine(&self) -> MutexGuard<'_, Machine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hands the state to the machine; accepted states go to the sink first
    fn accept(&self, generation: u64, state: &AgentState) -> Verdict {
        self.machine().accept(generation, state, |accepted| {
            if let Some(sink) = &self.sink {
                sink.submit(accepted.clone());
            }
        })
    }
}

/// Drives runs of one agent and reports their progress
///
/// A controller runs at most one job at a time and can be reused for the next
/// one once the previous run is terminal or cancelled. Dropping the
/// controller cancels its run.
///
/// `start` and `attach` spawn onto the current tokio runtime.
pub struct PollingController {
    inner: Arc<Inner>,
}

impl PollingController {
    /// Controller with the client's poll interval and the tokio timer
    pub fn new(client: JobClient) -> Self {
        Self::builder(client).build()
    }

    pub fn builder(client: JobClient) -> ControllerBuilder {
        ControllerBuilder {
            interval: client.config().poll_interval,
            client,
            scheduler: Arc::new(TokioScheduler),
            sink: None,
        }
    }

    pub fn client(&self) -> &JobClient {
        &self.inner.client
    }

    pub fn poll_interval(&self) -> Duration {
        self.inner.interval
    }

    /// Receives every event from now on; drop the receiver to unsubscribe
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<PollEvent> {
        self.inner.machine().subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.inner.machine().phase()
    }

    /// Latest accepted state of the current run
    pub fn latest(&self) -> Option<AgentState> {
        self.inner.machine().latest().cloned()
    }

    pub fn run_handle(&self) -> Option<RunHandle> {
        self.inner.machine().run().cloned()
    }

    /// Starts a run and begins polling it
    ///
    /// Returns the initial state once the start request has been answered.
    /// The first status request follows one poll interval later. When the
    /// initial state is already terminal no polling happens.
    ///
    /// # Errors
    /// - [`ControllerError::Busy`] while another run is starting or polling
    /// - [`ControllerError::Client`] when the start request fails; the
    ///   controller returns to Idle
    /// - [`ControllerError::Cancelled`] when `cancel` was called meanwhile
    pub async fn start(&self, input: &JobInput) -> Result<AgentState, ControllerError> {
        let (generation, token) = self.inner.machine().begin(Phase::Starting, None)?;

        info!("Starting run of {}", self.inner.client.agent_name());

        let state = match self.inner.client.start_agent(input).await {
            Ok(state) => state,
            Err(e) => {
                return if self.inner.machine().abort_start(generation, e.clone()) {
                    Err(ControllerError::Client(e))
                } else {
                    Err(ControllerError::Cancelled)
                };
            }
        };

        match self.inner.accept(generation, &state) {
            Verdict::Discarded => return Err(ControllerError::Cancelled),
            Verdict::Finished => {}
            Verdict::Continue | Verdict::Stale => {
                poller::spawn(
                    Arc::clone(&self.inner),
                    PollTask {
                        run_id: state.run_id.clone(),
                        generation,
                        token,
                        delay_first: true,
                    },
                );
            }
        }

        Ok(state)
    }

    /// Serializes `input` and starts a run with it
    pub async fn start_typed<I: Serialize + ?Sized>(
        &self,
        input: &I,
    ) -> Result<AgentState, ControllerError> {
        let input = agentrun_core::to_job_input(input).map_err(|e| {
            ControllerError::Client(agentrun_client::ClientError::InvalidInput(e.to_string()))
        })?;
        self.start(&input).await
    }

    /// Follows a run that was started elsewhere
    ///
    /// Polls immediately, then every interval, exactly like a run started
    /// through [`PollingController::start`].
    pub fn attach(&self, run_id: impl Into<String>) -> Result<(), ControllerError> {
        let run_id = run_id.into();
        let (generation, token) = self
            .inner
            .machine()
            .begin(Phase::Polling, Some(RunHandle::new(run_id.clone())))?;

        info!("Attaching to run {} of {}", run_id, self.inner.client.agent_name());

        poller::spawn(
            Arc::clone(&self.inner),
            PollTask {
                run_id,
                generation,
                token,
                delay_first: false,
            },
        );

        Ok(())
    }

    /// Waits until the sink has received every state accepted so far
    ///
    /// Saves run in the background; call this before shutting the runtime
    /// down, or the last states (usually the terminal one) may be lost.
    /// Returns at once without a sink.
    pub async fn flush(&self) {
        if let Some(sink) = &self.inner.sink {
            sink.flush().await;
        }
    }

    /// Stops polling and returns to Idle
    ///
    /// A pending delay never fires. A request already in flight is allowed to
    /// finish but its result is dropped. Safe to call in any phase, any number
    /// of times. The remote run itself keeps going.
    pub fn cancel(&self) {
        self.inner.machine().cancel();
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for PollingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingController")
            .field("agent", &self.inner.client.agent_name())
            .field("interval", &self.inner.interval)
            .field("phase", &self.phase())
            .finish()
    }
}
