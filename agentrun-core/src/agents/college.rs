//! College finder agent

use serde::{Deserialize, Serialize};

use crate::domain::state::AgentState;

/// Search criteria for the college finder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollegeFinderInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tuition: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_acceptance_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_colleges: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sat_score: Option<u32>,
}

/// A college found by the agent
///
/// Numbers arrive as free text ("$45,000", "12%") and are kept that way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct College {
    pub name: String,
    pub location: String,
    pub description: String,
    pub acceptance_rate: Option<String>,
    pub tuition: Option<String>,
    pub enrollment: Option<String>,
    pub dorm_percentage: Option<String>,
    pub sat_scores: Option<String>,
    pub programs: Option<Vec<String>>,
    pub url: Option<String>,
    pub has_missing_fields: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollegeFinderState {
    pub major: Option<String>,
    pub location_preference: Option<String>,
    pub max_tuition: Option<f64>,
    pub min_acceptance_rate: Option<f64>,
    pub max_colleges: Option<u32>,
    pub sat_score: Option<u32>,
    pub search_query: String,
    pub colleges: Vec<College>,
    pub recommendations: Vec<String>,
    pub data_gathering_attempts: u32,
}

pub type CollegeAgentState = AgentState<CollegeFinderState>;
