//! Controller error types

use agentrun_client::ClientError;
use thiserror::Error;

use crate::controller::Phase;

/// Errors returned to the caller of `start` / `attach`
#[derive(Debug, Clone, Error)]
pub enum ControllerError {
    /// The agent could not be reached or answered badly
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A run is already in progress on this controller
    #[error("a run is already in progress ({0})")]
    Busy(Phase),

    /// The run was cancelled before its start response arrived
    #[error("run was cancelled")]
    Cancelled,
}
