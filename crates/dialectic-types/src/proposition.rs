// Proposition model
// A single validated proposition of an argument, immutable for one request.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use dialectic_error::InputError;

use crate::PropositionId;

/// Role a proposition plays in the argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropositionKind {
    Claim,
    Evidence,
    Assumption,
    Constraint,
    Risk,
}

impl FromStr for PropositionKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claim" | "conclusion" => Ok(PropositionKind::Claim),
            "evidence" => Ok(PropositionKind::Evidence),
            "assumption" | "premise" => Ok(PropositionKind::Assumption),
            "constraint" => Ok(PropositionKind::Constraint),
            "risk" => Ok(PropositionKind::Risk),
            other => Err(InputError::unknown_variant("kind", other)),
        }
    }
}

impl fmt::Display for PropositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropositionKind::Claim => "claim",
            PropositionKind::Evidence => "evidence",
            PropositionKind::Assumption => "assumption",
            PropositionKind::Constraint => "constraint",
            PropositionKind::Risk => "risk",
        };
        f.write_str(name)
    }
}

/// How strongly the speaker asserted a proposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
    /// Stated as an absolute without any hedging
    UnstatedAsAbsolute,
}

impl Confidence {
    /// High or stated as absolute
    pub fn is_certain(&self) -> bool {
        matches!(self, Confidence::High | Confidence::UnstatedAsAbsolute)
    }
}

impl FromStr for Confidence {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Confidence::High),
            "medium" => Ok(Confidence::Medium),
            "low" => Ok(Confidence::Low),
            "unstated_as_absolute" | "unstated-as-absolute" | "absolute" => {
                Ok(Confidence::UnstatedAsAbsolute)
            }
            other => Err(InputError::unknown_variant("confidence", other)),
        }
    }
}

/// A validated proposition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    pub id: PropositionId,

    /// Source text, opaque to the engine
    pub statement: String,

    /// Symbolic-logic rendering; `None` when absent or blank
    pub formal_expression: Option<String>,

    pub kind: PropositionKind,

    pub confidence: Confidence,

    pub is_implicit: bool,

    /// Advisory flag from upstream; centrality analysis refines it
    pub is_load_bearing: bool,
}

impl Proposition {
    /// Create a proposition with medium confidence and no formal expression
    pub fn new(id: impl Into<PropositionId>, kind: PropositionKind) -> Self {
        Self {
            id: id.into(),
            statement: String::new(),
            formal_expression: None,
            kind,
            confidence: Confidence::Medium,
            is_implicit: false,
            is_load_bearing: false,
        }
    }

    /// Set the statement text
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = statement.into();
        self
    }

    /// Set the formal expression; blank strings are stored as `None`
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        let expression = expression.into();
        self.formal_expression = if expression.trim().is_empty() {
            None
        } else {
            Some(expression)
        };
        self
    }

    /// Set the confidence
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Text used when quoting the proposition in explanations
    pub fn display_text(&self) -> &str {
        if self.statement.trim().is_empty() {
            self.formal_expression.as_deref().unwrap_or(self.id.as_str())
        } else {
            &self.statement
        }
    }
}
