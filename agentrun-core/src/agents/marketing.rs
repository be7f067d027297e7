//! SaaS marketing agent

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::state::AgentState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingInput {
    pub app_name: String,
    pub app_url: String,
    #[serde(rename = "max_personas", skip_serializing_if = "Option::is_none")]
    pub max_personas: Option<u32>,
    #[serde(rename = "competitor_hint", skip_serializing_if = "Option::is_none")]
    pub competitor_hint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Competitor {
    pub name: String,
    pub description: String,
    pub url: String,
}

/// Marketing plan as it is built up by the agent
///
/// Mixed-case field names mirror what the agent runtime emits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketingPlanState {
    #[serde(rename = "appName")]
    pub app_name: String,
    #[serde(rename = "appUrl")]
    pub app_url: Option<String>,
    pub competitor_hint: Option<String>,
    #[serde(rename = "appDescription")]
    pub app_description: String,
    pub keyfeatures: Vec<String>,
    pub value_proposition: String,
    pub max_personas: u32,
    pub human_feedback: String,
    pub personas: Vec<Persona>,
    pub competitors: Vec<Competitor>,
    pub keywords: Vec<String>,
    pub tagline: String,
    pub subreddits: Vec<String>,
    pub marketing_suggestions: Vec<String>,
    pub search_results: Vec<JsonValue>,
}

pub type MarketingAgentState = AgentState<MarketingPlanState>;
