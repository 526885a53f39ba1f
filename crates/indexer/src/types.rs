//! Wire types of the indexer's GraphQL API.

use emblem_primitives::{
    badge::{parse_definition_number, BadgeRecord},
    errors::EncodingError,
};
use serde::{Deserialize, Serialize};

/// Query for one window of earned badges in global badge number order.
pub const EARNED_BADGES_QUERY: &str = "query earnedBadges($treeSize: Int!, $startingIndex: Int!) {
  earnedBadgeCounts(first: $treeSize, skip: $startingIndex, orderBy: globalBadgeNumber) {
    earnedBadge {
      badgeWinner { id }
      definition { badgeDefinitionNumber }
    }
  }
}";

#[derive(Clone, Debug, Serialize)]
pub struct GraphQlRequest<V> {
    pub query: &'static str,
    pub variables: V,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowVariables {
    pub tree_size: u64,
    pub starting_index: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadgeCounts {
    pub earned_badge_counts: Vec<EarnedBadgeCount>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadgeCount {
    pub earned_badge: EarnedBadge,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    pub badge_winner: BadgeWinner,
    pub definition: BadgeDefinition,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BadgeWinner {
    pub id: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDefinition {
    pub badge_definition_number: RawDefinitionNumber,
}

/// Subgraphs serialize big integers as strings, small ones may come as numbers.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDefinitionNumber {
    Number(i64),
    Text(String),
}

impl RawDefinitionNumber {
    pub fn to_i64(&self) -> Result<i64, EncodingError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => parse_definition_number(s),
        }
    }
}

impl EarnedBadgeCount {
    pub fn to_record(&self) -> Result<BadgeRecord, EncodingError> {
        let badge = &self.earned_badge;
        BadgeRecord::try_from_raw(
            &badge.badge_winner.id,
            badge.definition.badge_definition_number.to_i64()?,
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_variables_are_camel_case() {
        let req = GraphQlRequest {
            query: EARNED_BADGES_QUERY,
            variables: WindowVariables {
                tree_size: 16,
                starting_index: 32,
            },
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["variables"], json!({"treeSize": 16, "startingIndex": 32}));
    }

    #[test]
    fn test_parse_response() {
        let body = json!({
            "data": {
                "earnedBadgeCounts": [
                    {"earnedBadge": {
                        "badgeWinner": {"id": "0x5fbdb2315678afecb367f032d93f642f64180aa3"},
                        "definition": {"badgeDefinitionNumber": "7"}
                    }},
                    {"earnedBadge": {
                        "badgeWinner": {"id": "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512"},
                        "definition": {"badgeDefinitionNumber": -3}
                    }}
                ]
            }
        });
        let resp: GraphQlResponse<EarnedBadgeCounts> = serde_json::from_value(body).unwrap();
        assert!(resp.errors.is_empty());
        let counts = resp.data.unwrap().earned_badge_counts;
        let recs = counts
            .iter()
            .map(|c| c.to_record().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(recs[0].badge_definition_number(), 7);
        assert_eq!(recs[1].badge_definition_number(), -3);
    }

    #[test]
    fn test_bad_definition_number() {
        let raw = RawDefinitionNumber::Text("seven".to_owned());
        assert!(matches!(
            raw.to_i64(),
            Err(EncodingError::DefinitionNotInteger(_))
        ));

        let count: EarnedBadgeCount = serde_json::from_value(json!({
            "earnedBadge": {
                "badgeWinner": {"id": "0x5fbdb2315678afecb367f032d93f642f64180aa3"},
                "definition": {"badgeDefinitionNumber": "300"}
            }
        }))
        .unwrap();
        assert_eq!(
            count.to_record(),
            Err(EncodingError::DefinitionOutOfRange(300))
        );
    }
}
