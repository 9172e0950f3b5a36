// Relationship model
// Directed, typed edges between propositions.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use dialectic_error::InputError;

use crate::{PropositionId, RelationshipId};

/// Types of relationships between propositions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Source lends support to the target
    Supports,
    /// Source and target cannot both hold
    Contradicts,
    /// Source holds only if the target holds
    DependsOn,
    /// Rhetorical attack without logical negation
    Attacks,
    /// Source takes the target for granted
    Assumes,
}

impl RelationshipKind {
    /// Edges that express "X is true because Y" chains
    pub fn is_support_chain(&self) -> bool {
        matches!(self, RelationshipKind::Supports | RelationshipKind::DependsOn)
    }

    /// Edges that create a logical dependency
    pub fn is_dependency(&self) -> bool {
        matches!(
            self,
            RelationshipKind::Supports | RelationshipKind::DependsOn | RelationshipKind::Assumes
        )
    }
}

impl FromStr for RelationshipKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supports" => Ok(RelationshipKind::Supports),
            "contradicts" => Ok(RelationshipKind::Contradicts),
            "depends_on" | "depends-on" | "concludes_from" => Ok(RelationshipKind::DependsOn),
            "attacks" => Ok(RelationshipKind::Attacks),
            "assumes" => Ok(RelationshipKind::Assumes),
            other => Err(InputError::unknown_variant("relationship kind", other)),
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipKind::Supports => "supports",
            RelationshipKind::Contradicts => "contradicts",
            RelationshipKind::DependsOn => "depends_on",
            RelationshipKind::Attacks => "attacks",
            RelationshipKind::Assumes => "assumes",
        };
        f.write_str(name)
    }
}

/// Strength of a relationship, ordered weak < moderate < strong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl FromStr for Strength {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weak" => Ok(Strength::Weak),
            "moderate" => Ok(Strength::Moderate),
            "strong" => Ok(Strength::Strong),
            other => Err(InputError::unknown_variant("strength", other)),
        }
    }
}

/// A validated relationship whose endpoints exist in the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub from_id: PropositionId,
    pub to_id: PropositionId,
    pub kind: RelationshipKind,
    pub strength: Strength,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Relationship {
    /// Create a strong relationship without a label
    pub fn new(
        id: impl Into<RelationshipId>,
        from_id: impl Into<PropositionId>,
        to_id: impl Into<PropositionId>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            id: id.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
            kind,
            strength: Strength::Strong,
            label: None,
        }
    }

    /// Set the strength
    pub fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.from_id == self.to_id
    }
}
