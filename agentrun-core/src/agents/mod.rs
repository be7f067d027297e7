//! Known agents
//!
//! Every agent speaks the same start/status contract; they differ only in
//! their name and in the shape of `current_state`. The submodules hold the
//! typed views of each agent's input and state. All state fields default so
//! that partial, in-progress payloads still decode.

pub mod college;
pub mod marketing;
pub mod roster;
pub mod vacation;

use std::str::FromStr;

pub use college::CollegeAgentState;
pub use marketing::MarketingAgentState;
pub use roster::TeamRosterAgentState;
pub use vacation::VacationHouseAgentState;

/// Agents deployed behind the agent runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    College,
    Marketing,
    TeamRoster,
    Roster,
    VacationHouse,
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        AgentKind::College,
        AgentKind::Marketing,
        AgentKind::TeamRoster,
        AgentKind::Roster,
        AgentKind::VacationHouse,
    ];

    /// Name used in API paths (`/api/{name}/start`)
    pub fn name(self) -> &'static str {
        match self {
            AgentKind::College => "college-agent",
            AgentKind::Marketing => "marketing-agent",
            AgentKind::TeamRoster => "team-roster-agent",
            AgentKind::Roster => "roster-agent",
            AgentKind::VacationHouse => "vacation-house-agent",
        }
    }

    /// Path of the tool page that renders this agent's runs
    pub fn tool_path(self) -> &'static str {
        match self {
            AgentKind::College => "college-finder-agent",
            AgentKind::Marketing => "saas-marketing-agent",
            AgentKind::TeamRoster | AgentKind::Roster => "team-roster-agent",
            AgentKind::VacationHouse => "vacation-house-agent",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AgentKind::College => "Finds colleges matching a major, budget and location",
            AgentKind::Marketing => "Drafts a marketing plan for a SaaS product",
            AgentKind::TeamRoster => "Collects a college team roster with player details",
            AgentKind::Roster => "Collects a college team roster (legacy route)",
            AgentKind::VacationHouse => "Finds vacation towns and homes for a search query",
        }
    }

    /// Looks up an agent by its API name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown agent: {}", s))
    }
}

/// Tool page path for an agent name; unknown agents use their own name
pub fn tool_path_for(agent_name: &str) -> String {
    match AgentKind::from_name(agent_name) {
        Some(kind) => kind.tool_path().to_string(),
        None => agent_name.to_lowercase(),
    }
}

/// Shareable link that reopens a run on its tool page
pub fn share_url(site_url: &str, agent_name: &str, run_id: &str) -> String {
    format!(
        "{}/tools/{}?runId={}",
        site_url.trim_end_matches('/'),
        tool_path_for(agent_name),
        urlencoding::encode(run_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.name().parse::<AgentKind>().unwrap(), kind);
        }
        assert_eq!(AgentKind::from_name("College-Agent"), Some(AgentKind::College));
        assert!("weather-agent".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_share_url() {
        assert_eq!(
            share_url("https://example.com/", "college-agent", "r1"),
            "https://example.com/tools/college-finder-agent?runId=r1"
        );
        assert_eq!(
            share_url("https://example.com", "Weather-Agent", "a b"),
            "https://example.com/tools/weather-agent?runId=a%20b"
        );
    }
}
