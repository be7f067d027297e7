//! Health Check API Handler

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::state::ProxyState;

/// GET /health
/// Reports the agents this proxy serves
pub async fn health_check(State(state): State<ProxyState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "agents": state.agent_names(),
        })),
    )
}
