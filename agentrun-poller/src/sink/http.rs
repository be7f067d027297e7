//! HTTP sink
//!
//! Posts each accepted state to a create-or-update endpoint that upserts by
//! `run_id`, such as a run database behind the web app.

use agentrun_client::AgentState;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{SinkError, StateSink};

/// Default request timeout for saves
pub const DEFAULT_SAVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Saves states by POSTing them as JSON
#[derive(Debug, Clone)]
pub struct HttpStateSink {
    client: Client,
    url: String,
    agent_name: String,
    timeout: Duration,
}

impl HttpStateSink {
    /// # Arguments
    /// * `url` - Full URL of the save endpoint
    /// * `agent_name` - Stamped on states that do not name their agent
    pub fn new(url: impl Into<String>, agent_name: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url, agent_name)
    }

    pub fn with_client(
        client: Client,
        url: impl Into<String>,
        agent_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            agent_name: agent_name.into(),
            timeout: DEFAULT_SAVE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn payload(&self, state: &AgentState) -> AgentState {
        let mut payload = state.clone();
        if payload.agent_name.is_none() {
            payload.agent_name = Some(self.agent_name.clone());
        }
        payload
    }
}

#[async_trait]
impl StateSink for HttpStateSink {
    async fn save(&self, state: &AgentState) -> Result<(), SinkError> {
        let payload = self.payload(state);

        debug!("POST {} (run {})", self.url, state.run_id);

        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .text()
            .await
            .ok()
            .filter(|body| !body.is_empty())
            .unwrap_or_else(|| "Unknown error".to_string());

        Err(SinkError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    const SAVE_PATH: &str = "/api/agent-db/create-update";

    /// Local save endpoint answering every POST with `status` and `reply`
    async fn serve(
        status: StatusCode,
        reply: &'static str,
    ) -> (String, mpsc::UnboundedReceiver<Value>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new().route(
            SAVE_PATH,
            post(move |Json(body): Json<Value>| async move {
                let _ = tx.send(body);
                (status, reply)
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        (format!("http://{}{}", addr, SAVE_PATH), rx)
    }

    fn sink(url: &str) -> HttpStateSink {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpStateSink::with_client(client, url, "college-agent")
    }

    fn running() -> AgentState {
        serde_json::from_value(json!({
            "run_id": "r1",
            "status": "RUNNING",
            "current_state": { "colleges": [] },
            "status_updates": ["searching"]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_posts_stamped_state() {
        let (url, mut received) = serve(StatusCode::OK, "{}").await;

        sink(&url).save(&running()).await.unwrap();

        let body = received.recv().await.unwrap();
        assert_eq!(body["run_id"], "r1");
        assert_eq!(body["status"], "RUNNING");
        assert_eq!(body["agent_name"], "college-agent");
        assert_eq!(body["status_updates"], json!(["searching"]));
    }

    #[tokio::test]
    async fn test_non_success_is_rejected() {
        let (url, _received) =
            serve(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").await;

        let err = sink(&url).save(&running()).await.unwrap_err();
        match err {
            SinkError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_rejection_body() {
        let (url, _received) = serve(StatusCode::SERVICE_UNAVAILABLE, "").await;

        let err = sink(&url).save(&running()).await.unwrap_err();
        assert!(matches!(
            err,
            SinkError::Rejected { status: 503, ref message } if message == "Unknown error"
        ));
    }

    #[test]
    fn test_payload_stamps_missing_agent_name() {
        let sink = HttpStateSink::new("http://localhost:3000/api/agent-db/create-update", "college");

        let unnamed: AgentState =
            serde_json::from_value(json!({ "run_id": "r1", "status": "RUNNING" })).unwrap();
        assert_eq!(sink.payload(&unnamed).agent_name.as_deref(), Some("college"));

        let named: AgentState = serde_json::from_value(json!({
            "run_id": "r1",
            "status": "RUNNING",
            "agent_name": "marketing"
        }))
        .unwrap();
        assert_eq!(sink.payload(&named).agent_name.as_deref(), Some("marketing"));
    }

    #[test]
    fn test_timeout_override() {
        let sink = HttpStateSink::new("http://localhost/save", "college")
            .with_timeout(Duration::from_secs(2));
        assert_eq!(sink.timeout, Duration::from_secs(2));
        assert_eq!(sink.url(), "http://localhost/save");
    }
}
