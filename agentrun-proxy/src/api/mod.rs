//! API Module
//!
//! HTTP API layer of the proxy. It exposes the agent contract unchanged, so
//! browsers talk to the proxy while the agent runtime stays private.

pub mod agent;
pub mod error;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::ProxyState;

/// Create the main API router with all endpoints
pub fn create_router(state: ProxyState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Agent endpoints
        .route("/api/{agent}/start", post(agent::start_agent))
        .route("/api/{agent}/status/{run_id}", get(agent::get_status))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
