//! Vacation house agent

use serde::{Deserialize, Serialize};

use crate::domain::state::AgentState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VacationHouseInput {
    pub search_query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessInfo {
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub distance_from_home: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VacationHome {
    pub address: String,
    pub price: String,
    pub link: String,
    pub why_it_matches: String,
    pub walk_score: String,
    pub bars_and_restaurants: Vec<BusinessInfo>,
    pub coffee_shops: Vec<BusinessInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityInfo {
    pub city: String,
    pub state: String,
    pub price_range: String,
    pub why_it_matches: String,
    pub short_term_rental_info: String,
    pub homes: Vec<VacationHome>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultSummary {
    pub summary: String,
    pub candidate_cities: Vec<CityInfo>,
}

/// Final answer of the agent: its raw text plus the parsed summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VacationHouseState {
    pub raw: String,
    pub json_dict: ResultSummary,
}

pub type VacationHouseAgentState = AgentState<VacationHouseState>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_summary_decodes() {
        let state: VacationHouseState = serde_json::from_value(json!({
            "raw": "...",
            "json_dict": {
                "summary": "Two good towns",
                "candidate_cities": [{
                    "city": "Asheville",
                    "state": "NC",
                    "homes": [{
                        "address": "1 Main St",
                        "coffee_shops": [{ "name": "Bean", "type": "cafe", "distanceFromHome": "0.2mi" }]
                    }]
                }]
            }
        }))
        .unwrap();

        let city = &state.json_dict.candidate_cities[0];
        assert_eq!(city.city, "Asheville");
        assert_eq!(city.homes[0].coffee_shops[0].kind, "cafe");
        assert_eq!(city.homes[0].coffee_shops[0].distance_from_home, "0.2mi");
    }
}
