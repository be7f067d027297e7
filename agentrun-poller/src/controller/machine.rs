//! Run state machine
//!
//! All controller state lives in [`Machine`], guarded by one mutex. Each run
//! gets a new generation number; work belonging to an older generation (a
//! response that arrives after `cancel`, for example) is discarded on arrival.

use agentrun_client::{AgentState, AgentStatus, ClientError, RunHandle};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::ControllerError;

/// Local phase of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No run in progress
    Idle,
    /// Start request in flight
    Starting,
    /// Run id known, agent still running
    Polling,
    /// Agent reported COMPLETED
    Completed,
    /// Agent reported ERROR, or the runtime could not be polled
    Failed,
}

impl Phase {
    /// A run is in progress and owns the controller
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Starting | Phase::Polling)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }

    fn for_status(status: AgentStatus) -> Self {
        match status {
            AgentStatus::Running => Phase::Polling,
            AgentStatus::Completed => Phase::Completed,
            AgentStatus::Error => Phase::Failed,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Starting => write!(f, "Starting"),
            Phase::Polling => write!(f, "Polling"),
            Phase::Completed => write!(f, "Completed"),
            Phase::Failed => write!(f, "Failed"),
        }
    }
}

/// Notification delivered to subscribers
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// The controller changed phase
    Transition { from: Phase, to: Phase },
    /// A state was accepted (start response or poll response)
    State(AgentState),
    /// The runtime could not be reached or answered badly
    Error(ClientError),
}

/// What happened to a response handed to [`Machine::accept`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Accepted, run still going
    Continue,
    /// Accepted, run reached a terminal state
    Finished,
    /// Older than what was already seen; run still going
    Stale,
    /// The run it belongs to is no longer current
    Discarded,
}

pub(crate) struct Machine {
    phase: Phase,
    generation: u64,
    run: Option<RunHandle>,
    latest: Option<AgentState>,
    cancel: Option<CancellationToken>,
    subscribers: Vec<mpsc::UnboundedSender<PollEvent>>,
}

impl Machine {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            run: None,
            latest: None,
            cancel: None,
            subscribers: Vec::new(),
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn latest(&self) -> Option<&AgentState> {
        self.latest.as_ref()
    }

    pub(crate) fn run(&self) -> Option<&RunHandle> {
        self.run.as_ref()
    }

    pub(crate) fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PollEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Opens a new run entering `phase`
    ///
    /// Rejected while another run is starting or polling.
    pub(crate) fn begin(
        &mut self,
        phase: Phase,
        run: Option<RunHandle>,
    ) -> Result<(u64, CancellationToken), ControllerError> {
        if self.phase.is_active() {
            return Err(ControllerError::Busy(self.phase));
        }

        self.generation += 1;
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        self.run = run;
        self.latest = None;
        self.transition(phase);

        Ok((self.generation, token))
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.phase.is_active()
    }

    /// Records a state returned by the runtime
    ///
    /// `on_accept` runs for an accepted state before any event is emitted, so
    /// a collaborator sees the terminal state before subscribers learn the run
    /// is over.
    pub(crate) fn accept<F>(&mut self, generation: u64, state: &AgentState, on_accept: F) -> Verdict
    where
        F: FnOnce(&AgentState),
    {
        if !self.is_current(generation) {
            debug!("Discarding state of run {} from a cancelled run", state.run_id);
            return Verdict::Discarded;
        }

        if let Some(latest) = &self.latest {
            if is_stale(latest, state) {
                debug!("Ignoring out-of-order state of run {}", state.run_id);
                return Verdict::Stale;
            }
        }

        on_accept(state);

        if self.run.is_none() {
            self.run = Some(state.handle());
        }
        self.latest = Some(state.clone());
        self.emit(PollEvent::State(state.clone()));

        let next = Phase::for_status(state.status);
        self.transition(next);

        if next.is_terminal() {
            self.cancel = None;
            Verdict::Finished
        } else {
            Verdict::Continue
        }
    }

    /// Ends the run after a transport-level failure while polling
    pub(crate) fn fail(&mut self, generation: u64, error: ClientError) {
        if !self.is_current(generation) {
            return;
        }

        self.emit(PollEvent::Error(error));
        self.cancel = None;
        self.transition(Phase::Failed);
    }

    /// Returns to Idle after the start request failed
    ///
    /// Returns false when the run was cancelled in the meantime.
    pub(crate) fn abort_start(&mut self, generation: u64, error: ClientError) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        self.emit(PollEvent::Error(error));
        self.cancel = None;
        self.run = None;
        self.transition(Phase::Idle);
        true
    }

    /// Stops any run and forgets the latest state
    pub(crate) fn cancel(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.run = None;
        self.latest = None;
        self.transition(Phase::Idle);
    }

    fn transition(&mut self, to: Phase) {
        if self.phase == to {
            return;
        }

        let from = std::mem::replace(&mut self.phase, to);
        info!("Controller phase {} -> {}", from, to);
        self.emit(PollEvent::Transition { from, to });
    }

    fn emit(&mut self, event: PollEvent) {
        // Dropped receivers unsubscribe
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// A state is stale when it would move the displayed run backwards: either
/// RUNNING after a terminal state, or an older `last_update`
fn is_stale(latest: &AgentState, incoming: &AgentState) -> bool {
    if latest.is_terminal() && incoming.is_running() {
        return true;
    }

    match (latest.last_update, incoming.last_update) {
        (Some(seen), Some(new)) => new < seen,
        _ => false,
    }
}
