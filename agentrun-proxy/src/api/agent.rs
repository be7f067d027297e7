//! Agent API Handlers
//!
//! Forward start and status calls to the upstream agent runtime. Upstream
//! bodies are checked to be agent states and then passed through unchanged.

use agentrun_client::{JobClient, JobInput};
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::state::ProxyState;

fn client<'a>(state: &'a ProxyState, agent: &str) -> ApiResult<&'a JobClient> {
    state
        .client(agent)
        .ok_or_else(|| ApiError::UnknownAgent(agent.to_string()))
}

/// POST /api/{agent}/start
/// Start a run with the request body as job input
pub async fn start_agent(
    State(state): State<ProxyState>,
    Path(agent): Path<String>,
    Json(input): Json<JobInput>,
) -> ApiResult<Json<Value>> {
    let client = client(&state, &agent)?;
    tracing::info!("Starting {}", client.agent_name());

    let run = client
        .start_agent_json(&input)
        .await
        .map_err(ApiError::StartFailed)?;
    tracing::info!(
        "Started run {} of {}",
        run["run_id"].as_str().unwrap_or_default(),
        client.agent_name()
    );

    Ok(Json(run))
}

/// GET /api/{agent}/status/{run_id}
/// Current state of a run; never cached
pub async fn get_status(
    State(state): State<ProxyState>,
    Path((agent, run_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let client = client(&state, &agent)?;
    tracing::debug!("Getting status of run {} of {}", run_id, client.agent_name());

    let run = client
        .get_status_json(&run_id)
        .await
        .map_err(ApiError::StatusFailed)?;

    Ok(([(header::CACHE_CONTROL, "no-store")], Json(run)))
}
