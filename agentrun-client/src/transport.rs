//! HTTP transport seam
//!
//! [`JobClient`](crate::JobClient) talks to the agent runtime through the
//! [`Transport`] trait so that tests can substitute scripted responses for a
//! real network. [`ReqwestTransport`] is the production implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::error::TransportFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single request to the agent runtime
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<JsonValue>,
    pub timeout: Duration,
}

/// Raw response: status code plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the agent runtime
///
/// Implementations must enforce `request.timeout` and report an expired
/// timeout as [`TransportFailure::Timeout`]. Non-success status codes are
/// returned as responses, not failures.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Uses a preconfigured reqwest client (proxies, TLS settings, ...)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        let builder = builder
            .timeout(request.timeout)
            .header(reqwest::header::ACCEPT, "application/json");

        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| classify(e, request.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| classify(e, request.timeout))?;

        Ok(HttpResponse { status, body })
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout(timeout)
    } else {
        TransportFailure::Request(error.to_string())
    }
}
