//! API Error Handling
//!
//! Upstream failures are never passed through: the caller gets a fixed
//! message and the cause goes to the log.

use agentrun_client::ClientError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Failed to start agent")]
    StartFailed(#[source] ClientError),

    #[error("Failed to get agent status")]
    StatusFailed(#[source] ClientError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownAgent(name) => {
                tracing::debug!("Request for unknown agent {}", name);
                StatusCode::NOT_FOUND
            }
            ApiError::StartFailed(err) => {
                tracing::error!("Error starting agent: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::StatusFailed(err) => {
                tracing::error!("Error getting agent status: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
