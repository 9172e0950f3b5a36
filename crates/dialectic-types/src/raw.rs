// Raw request shapes
// Lenient deserialisation targets for upstream records. Every field is
// optional and accepts the camelCase / legacy spellings seen upstream;
// `validation` turns these into the strict model exactly once.

use serde::{Deserialize, Serialize};

use crate::{Proposition, Relationship};

/// A proposition as received from the extraction collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProposition {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub statement: Option<String>,

    #[serde(default, alias = "formalExpression")]
    pub formal_expression: Option<String>,

    #[serde(default, alias = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub confidence: Option<String>,

    #[serde(default, alias = "isImplicit")]
    pub is_implicit: Option<bool>,

    #[serde(default, alias = "isLoadBearing")]
    pub is_load_bearing: Option<bool>,
}

/// A relationship as received from the extraction collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRelationship {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, alias = "fromId", alias = "source")]
    pub from_id: Option<String>,

    #[serde(default, alias = "toId", alias = "target")]
    pub to_id: Option<String>,

    #[serde(default, alias = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub strength: Option<String>,

    #[serde(default)]
    pub label: Option<String>,
}

/// One analysis batch: the full cumulative set for the current turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub propositions: Vec<RawProposition>,

    #[serde(default)]
    pub relationships: Vec<RawRelationship>,
}

impl AnalysisRequest {
    /// Build a request from already-typed records
    pub fn from_model(propositions: &[Proposition], relationships: &[Relationship]) -> Self {
        Self {
            propositions: propositions.iter().map(RawProposition::from).collect(),
            relationships: relationships.iter().map(RawRelationship::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty() && self.relationships.is_empty()
    }
}

impl From<&Proposition> for RawProposition {
    fn from(p: &Proposition) -> Self {
        Self {
            id: Some(p.id.to_string()),
            statement: Some(p.statement.clone()),
            formal_expression: p.formal_expression.clone(),
            kind: Some(p.kind.to_string()),
            confidence: Some(
                serde_json::to_value(p.confidence)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_else(|| "medium".to_string()),
            ),
            is_implicit: Some(p.is_implicit),
            is_load_bearing: Some(p.is_load_bearing),
        }
    }
}

impl From<&Relationship> for RawRelationship {
    fn from(r: &Relationship) -> Self {
        Self {
            id: Some(r.id.to_string()),
            from_id: Some(r.from_id.to_string()),
            to_id: Some(r.to_id.to_string()),
            kind: Some(r.kind.to_string()),
            strength: Some(
                serde_json::to_value(r.strength)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_else(|| "moderate".to_string()),
            ),
            label: r.label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_camel_case_and_legacy_names() {
        let json = r#"{
            "propositions": [
                {"id": "p1", "statement": "s", "formalExpression": "P", "type": "claim",
                 "confidence": "high", "isImplicit": false, "isLoadBearing": true, "isAnchored": true}
            ],
            "relationships": [
                {"id": "r1", "source": "p1", "target": "p2", "type": "supports", "strength": "weak"},
                {"id": "r2", "fromId": "p2", "toId": "p1", "type": "attacks"}
            ]
        }"#;
        let request: AnalysisRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.propositions[0].formal_expression.as_deref(), Some("P"));
        assert_eq!(request.propositions[0].kind.as_deref(), Some("claim"));
        assert_eq!(request.relationships[0].from_id.as_deref(), Some("p1"));
        assert_eq!(request.relationships[1].to_id.as_deref(), Some("p1"));
        assert_eq!(request.relationships[1].strength, None);
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let request: AnalysisRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());
    }
}
