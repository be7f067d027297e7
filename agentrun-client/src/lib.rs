//! Agentrun HTTP Client
//!
//! A small, type-safe client for long-running remote agents.
//!
//! Every agent exposes the same two endpoints:
//! - `POST {base}/api/{agent}/start` with the job input, answering the initial state
//! - `GET {base}/api/{agent}/status/{run_id}`, answering the current state
//!
//! One [`JobClient`] is bound to one agent through its [`AgentConfig`]. The
//! client keeps no per-run state, so a single instance can serve any number
//! of runs and clones are cheap.
//!
//! # Example
//!
//! ```no_run
//! use agentrun_client::{AgentConfig, JobClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JobClient::new(AgentConfig::new("college-agent", "http://localhost:8123"));
//!
//!     let state = client.start_typed(&json!({ "major": "CS" })).await?;
//!     let latest = client.get_status(&state.run_id).await?;
//!
//!     println!("run {} is {}", latest.run_id, latest.status);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod transport;

// Re-export commonly used types
pub use agentrun_core::{AgentState, AgentStatus, JobInput, RunHandle};
pub use config::{AgentConfig, ConfigError};
pub use error::{ClientError, Result, TransportFailure};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP client for one agent
#[derive(Clone)]
pub struct JobClient {
    config: AgentConfig,
    transport: Arc<dyn Transport>,
}

impl JobClient {
    /// Create a client using the default reqwest transport
    ///
    /// # Example
    /// ```
    /// use agentrun_client::{AgentConfig, JobClient};
    ///
    /// let client = JobClient::new(AgentConfig::new("college-agent", "http://localhost:8123"));
    /// assert_eq!(client.agent_name(), "college-agent");
    /// ```
    pub fn new(config: AgentConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client with a custom transport
    ///
    /// Used to share one connection pool between agents, or to substitute a
    /// scripted transport in tests.
    pub fn with_transport(config: AgentConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn agent_name(&self) -> &str {
        &self.config.agent_name
    }

    /// URL of the start endpoint
    pub fn start_url(&self) -> String {
        format!("{}/start", self.config.agent_url())
    }

    /// URL of the status endpoint for a run
    pub fn status_url(&self, run_id: &str) -> String {
        format!(
            "{}/status/{}",
            self.config.agent_url(),
            urlencoding::encode(run_id)
        )
    }

    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Submit a job to the agent
    ///
    /// The input is forwarded verbatim. The response body is the initial
    /// state of the run, usually `RUNNING` with an empty `current_state`.
    ///
    /// # Errors
    /// - [`ClientError::StartFailed`] on network failure, timeout or non-2xx status
    /// - [`ClientError::MalformedResponse`] when the body is not an agent state
    pub async fn start_agent(&self, input: &JobInput) -> Result<AgentState> {
        let (url, response) = self.send_start(input).await?;

        let state = decode_state(&url, &response.body)?;
        debug!(
            "Agent {} accepted run {} ({})",
            self.agent_name(),
            state.run_id,
            state.status
        );
        Ok(state)
    }

    /// Submit a job and return the initial state exactly as the agent sent it
    ///
    /// The body is still checked to be an agent state, but fields are not
    /// normalized: a missing `current_state` stays missing and timestamps
    /// and status keep their original spelling.
    pub async fn start_agent_json(&self, input: &JobInput) -> Result<JsonValue> {
        let (url, response) = self.send_start(input).await?;
        decode_verbatim(&url, &response.body)
    }

    /// Submit any serializable input
    ///
    /// # Errors
    /// [`ClientError::InvalidInput`] when the input is not a JSON object, plus
    /// everything [`JobClient::start_agent`] can return.
    pub async fn start_typed<I: Serialize + ?Sized>(&self, input: &I) -> Result<AgentState> {
        let input = agentrun_core::to_job_input(input)
            .map_err(|e| ClientError::InvalidInput(e.to_string()))?;
        self.start_agent(&input).await
    }

    /// Fetch the current state of a run
    ///
    /// The run id is not checked locally; an unknown id surfaces as whatever
    /// status the runtime answers with (see [`ClientError::is_not_found`]).
    ///
    /// # Errors
    /// - [`ClientError::StatusFetchFailed`] on network failure, timeout or non-2xx status
    /// - [`ClientError::MalformedResponse`] when the body is not an agent state
    pub async fn get_status(&self, run_id: &str) -> Result<AgentState> {
        let (url, response) = self.send_status(run_id).await?;
        decode_state(&url, &response.body)
    }

    /// Fetch the current state of a run exactly as the agent sent it
    ///
    /// See [`JobClient::start_agent_json`].
    pub async fn get_status_json(&self, run_id: &str) -> Result<JsonValue> {
        let (url, response) = self.send_status(run_id).await?;
        decode_verbatim(&url, &response.body)
    }

    // =============================================================================
    // Response Handling
    // =============================================================================

    async fn send_start(&self, input: &JobInput) -> Result<(String, HttpResponse)> {
        let url = self.start_url();
        debug!("Starting {} ({} input fields)", self.agent_name(), input.len());

        let request = HttpRequest {
            method: Method::Post,
            url: url.clone(),
            body: Some(JsonValue::Object(input.clone())),
            timeout: self.config.timeout,
        };

        let response = self
            .exchange(request, |source| ClientError::StartFailed {
                agent: self.config.agent_name.clone(),
                source,
            })
            .await?;

        Ok((url, response))
    }

    async fn send_status(&self, run_id: &str) -> Result<(String, HttpResponse)> {
        let url = self.status_url(run_id);

        let request = HttpRequest {
            method: Method::Get,
            url: url.clone(),
            body: None,
            timeout: self.config.timeout,
        };

        let response = self
            .exchange(request, |source| ClientError::StatusFetchFailed {
                run_id: run_id.to_string(),
                source,
            })
            .await?;

        Ok((url, response))
    }

    /// Send a request and turn transport failures and non-2xx statuses into
    /// the caller's error variant
    async fn exchange<F>(&self, request: HttpRequest, on_failure: F) -> Result<HttpResponse>
    where
        F: FnOnce(TransportFailure) -> ClientError,
    {
        let url = request.url.clone();

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(failure) => {
                warn!("Request to {} failed: {}", url, failure);
                return Err(on_failure(failure));
            }
        };

        if !response.is_success() {
            warn!("Request to {} returned status {}", url, response.status);
            return Err(on_failure(TransportFailure::status(
                response.status,
                response.body,
            )));
        }

        Ok(response)
    }
}

impl std::fmt::Debug for JobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn decode_state(url: &str, body: &str) -> Result<AgentState> {
    serde_json::from_str(body).map_err(|e| malformed(url, e))
}

/// Parses the body and checks it is an agent state, keeping it untouched
fn decode_verbatim(url: &str, body: &str) -> Result<JsonValue> {
    let value: JsonValue = serde_json::from_str(body).map_err(|e| malformed(url, e))?;
    AgentState::<JsonValue>::deserialize(&value).map_err(|e| malformed(url, e))?;
    Ok(value)
}

fn malformed(url: &str, e: serde_json::Error) -> ClientError {
    ClientError::MalformedResponse {
        url: url.to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockReply, MockTransport};
    use serde_json::json;
    use std::time::Duration;

    fn client(mock: &Arc<MockTransport>) -> JobClient {
        JobClient::with_transport(
            AgentConfig::new("college-agent", "http://agents.local/"),
            mock.clone(),
        )
    }

    #[test]
    fn test_urls() {
        let client = JobClient::new(AgentConfig::new("college-agent", "http://localhost:8123/"));
        assert_eq!(
            client.start_url(),
            "http://localhost:8123/api/college-agent/start"
        );
        assert_eq!(
            client.status_url("run/1 2"),
            "http://localhost:8123/api/college-agent/status/run%2F1%202"
        );
    }

    #[tokio::test]
    async fn test_start_forwards_input_verbatim() {
        let mock = Arc::new(MockTransport::new());
        mock.push_start(MockReply::json(json!({
            "run_id": "abc",
            "status": "RUNNING",
            "current_state": {}
        })));

        let mut input = JobInput::new();
        input.insert("major".to_string(), json!("CS"));
        input.insert("max_colleges".to_string(), json!(5));

        let state = client(&mock).start_agent(&input).await.unwrap();
        assert_eq!(state.run_id, "abc");
        assert_eq!(state.status, AgentStatus::Running);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].url, "http://agents.local/api/college-agent/start");
        assert_eq!(
            requests[0].body,
            Some(json!({ "major": "CS", "max_colleges": 5 }))
        );
        assert_eq!(requests[0].timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_start_non_success_is_start_failed() {
        let mock = Arc::new(MockTransport::new());
        mock.push_start(MockReply::raw(500, r#"{"error":"Failed to start agent"}"#));

        let err = client(&mock).start_agent(&JobInput::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::StartFailed { .. }));
        assert!(err.is_server_error());
        // No retry at this layer
        assert_eq!(mock.start_calls(), 1);
    }

    #[tokio::test]
    async fn test_start_timeout_is_start_failed() {
        let mock = Arc::new(MockTransport::new());
        mock.push_start(MockReply::fail(TransportFailure::Timeout(Duration::from_secs(30))));

        let err = client(&mock).start_agent(&JobInput::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::StartFailed { .. }));
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_start_typed_rejects_non_objects() {
        let mock = Arc::new(MockTransport::new());

        let err = client(&mock).start_typed(&json!("CS")).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert_eq!(mock.start_calls(), 0);
    }

    #[tokio::test]
    async fn test_status_success() {
        let mock = Arc::new(MockTransport::new());
        mock.push_status(MockReply::json(json!({
            "run_id": "abc",
            "status": "RUNNING",
            "current_state": { "colleges": [] },
            "status_updates": ["searching"]
        })));

        let state = client(&mock).get_status("abc").await.unwrap();
        assert_eq!(state.updates(), ["searching".to_string()]);

        let requests = mock.requests();
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(
            requests[0].url,
            "http://agents.local/api/college-agent/status/abc"
        );
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_status_not_found() {
        let mock = Arc::new(MockTransport::new());
        mock.push_status(MockReply::raw(404, "run not found"));

        let err = client(&mock).get_status("missing").await.unwrap_err();
        match &err {
            ClientError::StatusFetchFailed { run_id, .. } => assert_eq!(run_id, "missing"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_status_malformed_body() {
        let mock = Arc::new(MockTransport::new());
        mock.push_status(MockReply::raw(200, "<html>gateway</html>"));

        let err = client(&mock).get_status("abc").await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse { .. }));

        mock.push_status(MockReply::json(json!({ "run_id": "abc" })));
        let err = client(&mock).get_status("abc").await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_client_is_reusable_across_runs() {
        let mock = Arc::new(MockTransport::new());
        let client = client(&mock);

        for run in ["r1", "r2"] {
            mock.push_start(MockReply::json(json!({ "run_id": run, "status": "RUNNING" })));
            let state = client.start_agent(&JobInput::new()).await.unwrap();
            assert_eq!(state.run_id, run);
        }
        assert_eq!(mock.start_calls(), 2);
    }

    #[tokio::test]
    async fn test_json_variants_keep_upstream_body() {
        let mock = Arc::new(MockTransport::new());
        let upstream = json!({
            "run_id": "abc",
            "status": "running",
            "start_time": "2025-01-15 10:30:00",
            "last_update": 1736937000000i64
        });
        mock.push_start(MockReply::json(upstream.clone()));
        mock.push_status(MockReply::json(upstream.clone()));

        let client = client(&mock);
        assert_eq!(client.start_agent_json(&JobInput::new()).await.unwrap(), upstream);
        assert_eq!(client.get_status_json("abc").await.unwrap(), upstream);

        // The typed path normalizes the same body
        mock.push_status(MockReply::json(upstream));
        let state = client.get_status("abc").await.unwrap();
        assert_eq!(state.status, AgentStatus::Running);
        assert!(state.current_state.is_null());
    }

    #[tokio::test]
    async fn test_json_variants_reject_non_states() {
        let mock = Arc::new(MockTransport::new());
        mock.push_status(MockReply::json(json!({ "run_id": "abc", "status": "PAUSED" })));
        mock.push_start(MockReply::raw(200, "not json"));

        let client = client(&mock);
        let err = client.get_status_json("abc").await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse { .. }));

        let err = client.start_agent_json(&JobInput::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_json_variants_map_failures_like_typed_calls() {
        let mock = Arc::new(MockTransport::new());
        mock.push_status(MockReply::raw(404, "run not found"));

        let err = client(&mock).get_status_json("missing").await.unwrap_err();
        assert!(matches!(err, ClientError::StatusFetchFailed { .. }));
        assert!(err.is_not_found());
    }

    // =============================================================================
    // Real transport
    // =============================================================================

    /// reqwest transport that ignores proxy settings from the environment
    fn direct(config: AgentConfig) -> JobClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        JobClient::with_transport(config, Arc::new(ReqwestTransport::with_client(http)))
    }

    #[tokio::test]
    async fn test_timeout_is_enforced_by_reqwest_transport() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = AgentConfig::new("college-agent", format!("http://{}", addr))
            .with_timeout(Duration::from_millis(200));
        let client = direct(config);

        let err = client.get_status("r1").await.unwrap_err();
        match &err {
            ClientError::StatusFetchFailed { run_id, source } => {
                assert_eq!(run_id, "r1");
                assert_eq!(source, &TransportFailure::Timeout(Duration::from_millis(200)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = direct(AgentConfig::new("college-agent", format!("http://{}", addr)));

        let err = client.start_agent(&JobInput::new()).await.unwrap_err();
        match &err {
            ClientError::StartFailed { source, .. } => {
                assert!(matches!(source, TransportFailure::Request(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_timeout());
        assert_eq!(err.http_status(), None);
    }
}
