//! Team roster agent

use serde::{Deserialize, Serialize};

use crate::domain::state::AgentState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterAgentInput {
    pub college_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    pub name: String,
    pub height: Option<String>,
    pub hometown: Option<String>,
    pub position: Option<String>,
    pub handedness: Option<String>,
    pub velocity: Option<String>,
    pub pg_grade: Option<String>,
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    pub team_name: String,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRosterState {
    pub college_name: String,
    pub roster_url: Option<String>,
    pub team: Option<Team>,
    pub summary: Option<String>,
}

pub type TeamRosterAgentState = AgentState<TeamRosterState>;
