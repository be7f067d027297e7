//! Core domain types
//!
//! The agent state envelope is owned by the remote agent runtime. Every
//! component in this workspace only holds read-only copies of it.

pub mod run;
pub mod state;
