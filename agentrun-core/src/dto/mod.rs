//! Data Transfer Objects sent to the agent runtime

pub mod input;
