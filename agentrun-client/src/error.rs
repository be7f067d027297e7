//! Error types for the agent client

use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Why a single HTTP exchange with the agent runtime failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// The request could not be sent or the response could not be read
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// No response within the configured timeout
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The runtime answered with a non-success status code
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, or a placeholder when it was empty
        message: String,
    },
}

impl TransportFailure {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Status {
            status,
            message: if message.is_empty() {
                "Unknown error".to_string()
            } else {
                message
            },
        }
    }
}

/// Errors that can occur when talking to an agent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The job could not be submitted
    #[error("Failed to start agent {agent}: {source}")]
    StartFailed {
        agent: String,
        #[source]
        source: TransportFailure,
    },

    /// A status poll failed at the transport level
    #[error("Failed to get status of run {run_id}: {source}")]
    StatusFetchFailed {
        run_id: String,
        #[source]
        source: TransportFailure,
    },

    /// The body was not an agent state envelope
    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    /// The job input did not serialize to a JSON object
    #[error("Invalid job input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    fn transport(&self) -> Option<&TransportFailure> {
        match self {
            Self::StartFailed { source, .. } | Self::StatusFetchFailed { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    /// HTTP status code returned by the runtime, if it answered at all
    pub fn http_status(&self) -> Option<u16> {
        match self.transport() {
            Some(TransportFailure::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Check if the runtime reported the run or agent as unknown
    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.http_status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.http_status(), Some(status) if status >= 500)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.transport(), Some(TransportFailure::Timeout(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let err = ClientError::StatusFetchFailed {
            run_id: "r1".to_string(),
            source: TransportFailure::status(404, "not found"),
        };
        assert!(err.is_not_found());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.http_status(), Some(404));

        let err = ClientError::StartFailed {
            agent: "college-agent".to_string(),
            source: TransportFailure::status(502, ""),
        };
        assert!(err.is_server_error());
        assert!(err.to_string().contains("Unknown error"));
    }

    #[test]
    fn test_timeout_has_no_status() {
        let err = ClientError::StartFailed {
            agent: "college-agent".to_string(),
            source: TransportFailure::Timeout(Duration::from_secs(30)),
        };
        assert!(err.is_timeout());
        assert_eq!(err.http_status(), None);
        assert_eq!(
            err.to_string(),
            "Failed to start agent college-agent: request timed out after 30000ms"
        );
    }

    #[test]
    fn test_malformed_is_not_transport() {
        let err = ClientError::MalformedResponse {
            url: "http://localhost/api/x/status/1".to_string(),
            message: "expected value".to_string(),
        };
        assert!(!err.is_timeout());
        assert!(!err.is_not_found());
    }
}
