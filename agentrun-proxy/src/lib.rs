//! Agentrun Proxy
//!
//! Server-side relay in front of the agent runtime. Serves
//! `POST /api/{agent}/start` and `GET /api/{agent}/status/{run_id}` for a
//! configured set of agents and forwards each call upstream through a
//! [`agentrun_client::JobClient`].

pub mod api;
pub mod config;
pub mod state;

pub use api::create_router;
pub use config::ProxyConfig;
pub use state::ProxyState;
