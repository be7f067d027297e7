//! Agentrun Poller
//!
//! Drives a run of a remote agent from submission to a terminal state.
//!
//! Architecture:
//! - Controller: the run state machine, exposed through [`PollingController`]
//! - Scheduler: the delay between polls, injectable for tests
//! - Sink: optional persistence collaborator receiving every accepted state
//!
//! Polling is request → response → delay → request: the next status request
//! is only scheduled once the previous response has been processed, so a slow
//! runtime never sees overlapping requests from one controller.

pub mod controller;
pub mod error;
pub mod scheduler;
pub mod sink;

pub use controller::{ControllerBuilder, Phase, PollEvent, PollingController};
pub use error::ControllerError;
pub use scheduler::{Scheduler, TokioScheduler};
pub use sink::{HttpStateSink, MemoryStateSink, SinkError, StateSink};
