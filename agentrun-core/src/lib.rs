//! Agentrun Core
//!
//! Core types shared by every agentrun component.
//!
//! This crate contains:
//! - Domain types: the agent state envelope and run handles
//! - DTOs: job input payloads sent to the agent runtime
//! - Agents: the known agents and typed views of their state

pub mod agents;
pub mod domain;
pub mod dto;
mod serde_ext;

pub use domain::run::RunHandle;
pub use domain::state::{AgentState, AgentStatus};
pub use dto::input::{JobInput, to_job_input};
