//! Scripted in-memory transport for tests
//!
//! Start requests and status requests are answered from two separate queues.
//! A reply may be delayed (through tokio's clock, so paused-time tests run
//! instantly). The mock records every request and the highest number of
//! requests that were in flight at once.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::TransportFailure;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

/// One scripted answer
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(HttpResponse),
    Fail(TransportFailure),
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    /// 200 response with a JSON body
    pub fn json(body: JsonValue) -> Self {
        Self::Respond(HttpResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    /// Response with an arbitrary status and raw body
    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self::Respond(HttpResponse {
            status,
            body: body.into(),
        })
    }

    pub fn fail(failure: TransportFailure) -> Self {
        Self::Fail(failure)
    }

    pub fn delayed(self, delay: Duration) -> Self {
        Self::Delayed(delay, Box::new(self))
    }
}

#[derive(Default)]
struct MockState {
    start: VecDeque<MockReply>,
    status: VecDeque<MockReply>,
    requests: Vec<HttpRequest>,
    in_flight: usize,
    max_in_flight: usize,
    completed: usize,
}

/// Transport answering from scripted queues
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_start(&self, reply: MockReply) {
        self.lock().start.push_back(reply);
    }

    pub fn push_status(&self, reply: MockReply) {
        self.lock().status.push_back(reply);
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn start_calls(&self) -> usize {
        self.count(Method::Post)
    }

    pub fn status_calls(&self) -> usize {
        self.count(Method::Get)
    }

    /// Requests whose reply has been delivered
    pub fn completed_calls(&self) -> usize {
        self.lock().completed
    }

    pub fn max_in_flight(&self) -> usize {
        self.lock().max_in_flight
    }

    fn count(&self, method: Method) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|request| request.method == method)
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the original failure
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let reply = {
            let mut state = self.lock();
            let queue = match request.method {
                Method::Post => &mut state.start,
                Method::Get => &mut state.status,
            };
            let reply = queue.pop_front();
            state.requests.push(request);
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            reply
        };

        let mut reply = reply.unwrap_or_else(|| {
            MockReply::fail(TransportFailure::Request("no scripted reply".to_string()))
        });

        let result = loop {
            match reply {
                MockReply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
                MockReply::Respond(response) => break Ok(response),
                MockReply::Fail(failure) => break Err(failure),
            }
        };

        let mut state = self.lock();
        state.in_flight -= 1;
        state.completed += 1;

        result
    }
}
