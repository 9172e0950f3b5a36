// Analysis report types
// Output records produced by one analysis request.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::{PropositionId, Warning};

/// Outcome of the satisfiability check over the whole argument set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Satisfiability {
    Sat,
    Unsat,
    /// The search was stopped by the budget or a cancellation
    Unknown,
}

impl fmt::Display for Satisfiability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Satisfiability::Sat => write!(f, "sat"),
            Satisfiability::Unsat => write!(f, "unsat"),
            Satisfiability::Unknown => write!(f, "unknown"),
        }
    }
}

/// Severity of a contradiction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

/// Why a proof line holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Justification {
    /// A clause of the core, with the propositions and source text it came from
    Premise {
        proposition_ids: Vec<PropositionId>,
        source: String,
    },
    /// Hypothesis opening a case
    Assumption,
    /// Literal that occurs with one polarity only in the open clauses
    PureLiteral,
    /// The clause on line `clause` with the literals on `antecedents` refuted
    UnitResolution {
        clause: usize,
        antecedents: Vec<usize>,
    },
    /// Complementary literals on `positive` and `negative`
    Contradiction { positive: usize, negative: usize },
    /// The clause on line `clause` is empty
    EmptyClause { clause: usize },
    /// Every case, given as `[assumption line, ⊥ line]`, ends in ⊥
    CaseAnalysis { cases: Vec<[usize; 2]> },
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn lines(numbers: &[usize]) -> String {
            numbers.iter().map(usize::to_string).collect::<Vec<_>>().join(", ")
        }
        match self {
            Justification::Premise { proposition_ids, source } => {
                let ids: Vec<&str> = proposition_ids.iter().map(PropositionId::as_str).collect();
                write!(f, "premise from {}: {}", ids.join(", "), source)
            }
            Justification::Assumption => write!(f, "assume (case)"),
            Justification::PureLiteral => write!(f, "pure literal"),
            Justification::UnitResolution { clause, antecedents } if antecedents.is_empty() => {
                write!(f, "from clause {}", clause)
            }
            Justification::UnitResolution { clause, antecedents } => {
                write!(f, "from clause {} and lines {}, forced", clause, lines(antecedents))
            }
            Justification::Contradiction { positive, negative } => {
                write!(f, "contradiction of lines {} and {}", positive, negative)
            }
            Justification::EmptyClause { clause } => write!(f, "clause {} is empty", clause),
            Justification::CaseAnalysis { cases } => {
                let spans: Vec<String> = cases.iter().map(|[a, b]| format!("{}-{}", a, b)).collect();
                write!(f, "⊥ in both cases ({})", spans.join(", "))
            }
        }
    }
}

/// One numbered line of a derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofLine {
    /// 1-based line number
    pub number: usize,
    /// Nesting depth of case splits
    pub depth: usize,
    pub formula: String,
    pub justification: Justification,
}

/// A derivation ending in ⊥
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalProof {
    pub lines: Vec<ProofLine>,
    pub text: String,
}

impl FormalProof {
    /// Build a proof and its rendered text from structured lines
    pub fn from_lines(lines: Vec<ProofLine>) -> Self {
        let text = lines
            .iter()
            .map(|line| {
                format!(
                    "{:>3}. {}{}    [{}]",
                    line.number,
                    "  ".repeat(line.depth),
                    line.formula,
                    line.justification
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Self { lines, text }
    }

    /// True when the last line is ⊥ at depth 0
    pub fn concludes_bottom(&self) -> bool {
        self.lines
            .last()
            .map(|line| line.depth == 0 && line.formula == "⊥")
            .unwrap_or(false)
    }
}

/// A minimal set of jointly inconsistent propositions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    pub id: String,
    /// Every proposition whose clauses share a variable with the core
    pub proposition_ids: Vec<PropositionId>,
    pub minimal_core: Vec<PropositionId>,
    pub severity: Severity,
    pub formal_proof: FormalProof,
    pub human_explanation: String,
}

/// Structural defect category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Circular,
    HastyGeneralization,
    FalseDilemma,
    LoadBearing,
}

impl PatternType {
    /// Slug used in fallacy ids
    pub fn slug(&self) -> &'static str {
        match self {
            PatternType::Circular => "circular",
            PatternType::HastyGeneralization => "hasty",
            PatternType::FalseDilemma => "dilemma",
            PatternType::LoadBearing => "load-bearing",
        }
    }
}

/// A structural reasoning defect found in the relationship graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fallacy {
    pub id: String,
    pub name: String,
    pub pattern_type: PatternType,
    pub description: String,
    pub affected_node_ids: Vec<PropositionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_path: Option<Vec<PropositionId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_claims: Option<Vec<PropositionId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centrality: Option<f64>,
}

/// Cognitive bias category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasType {
    Anchoring,
    Confirmation,
    PlanningFallacy,
    AttributeSubstitution,
}

impl BiasType {
    /// Slug used in bias ids
    pub fn slug(&self) -> &'static str {
        match self {
            BiasType::Anchoring => "anchoring",
            BiasType::Confirmation => "confirmation",
            BiasType::PlanningFallacy => "planning",
            BiasType::AttributeSubstitution => "substitution",
        }
    }
}

/// How much of the argument leans on a biased proposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasSeverity {
    Low,
    Medium,
    High,
}

impl BiasSeverity {
    /// High above 0.3 centrality, medium above 0.1
    pub fn from_centrality(score: f64) -> Self {
        if score > 0.3 {
            BiasSeverity::High
        } else if score > 0.1 {
            BiasSeverity::Medium
        } else {
            BiasSeverity::Low
        }
    }
}

/// A cognitive bias recognised by its shape in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bias {
    pub id: String,
    pub name: String,
    pub bias_type: BiasType,
    /// Where the bias is described in the literature
    pub reference: String,
    pub description: String,
    pub affected_node_ids: Vec<PropositionId>,
    pub severity: BiasSeverity,
}

/// Derived values for one proposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropositionAnnotation {
    pub proposition_id: PropositionId,
    pub centrality: f64,
    pub load_bearing: bool,
    pub evidence_paths: usize,
    pub contradiction_count: usize,
    pub vulnerable_assumptions: Vec<PropositionId>,
    pub score: f64,
}

/// Result of one analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub satisfiability: Satisfiability,
    pub contradictions: Vec<Contradiction>,
    pub fallacies: Vec<Fallacy>,
    #[serde(default)]
    pub biases: Vec<Bias>,
    pub annotations: Vec<PropositionAnnotation>,
    /// Propositions in dependency order; nodes on cycles are omitted
    pub dependency_order: Vec<PropositionId>,
    /// A half of the analysis ran out of budget or was cancelled
    pub degraded: bool,
    pub warnings: Vec<Warning>,
}

impl AnalysisReport {
    /// Report for a request without propositions
    pub fn empty(warnings: Vec<Warning>) -> Self {
        Self {
            satisfiability: Satisfiability::Sat,
            contradictions: Vec::new(),
            fallacies: Vec::new(),
            biases: Vec::new(),
            annotations: Vec::new(),
            dependency_order: Vec::new(),
            degraded: false,
            warnings,
        }
    }

    /// Fallacies of one kind
    pub fn fallacies_of(&self, pattern: PatternType) -> impl Iterator<Item = &Fallacy> {
        self.fallacies.iter().filter(move |f| f.pattern_type == pattern)
    }

    /// Biases of one kind
    pub fn biases_of(&self, bias: BiasType) -> impl Iterator<Item = &Bias> {
        self.biases.iter().filter(move |b| b.bias_type == bias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_proof_text() {
        let proof = FormalProof::from_lines(vec![
            ProofLine {
                number: 1,
                depth: 0,
                formula: "P".into(),
                justification: Justification::Premise {
                    proposition_ids: vec!["p1".into()],
                    source: "P".into(),
                },
            },
            ProofLine {
                number: 2,
                depth: 0,
                formula: "¬P".into(),
                justification: Justification::Premise {
                    proposition_ids: vec!["p2".into()],
                    source: "¬P".into(),
                },
            },
            ProofLine {
                number: 3,
                depth: 0,
                formula: "⊥".into(),
                justification: Justification::Contradiction { positive: 1, negative: 2 },
            },
        ]);
        assert!(proof.concludes_bottom());
        assert!(proof.text.contains("premise from p1: P"));
        assert!(proof.text.ends_with("[contradiction of lines 1 and 2]"));
    }

    #[test]
    fn test_justification_serializes_with_rule_tag() {
        let json = serde_json::to_value(Justification::EmptyClause { clause: 4 }).unwrap();
        assert_eq!(json["rule"], "empty_clause");
        assert_eq!(json["clause"], 4);
    }

    #[test]
    fn test_bias_severity_bands() {
        assert_eq!(BiasSeverity::from_centrality(0.5), BiasSeverity::High);
        assert_eq!(BiasSeverity::from_centrality(0.3), BiasSeverity::Medium);
        assert_eq!(BiasSeverity::from_centrality(0.1), BiasSeverity::Low);
        assert_eq!(serde_json::to_value(BiasType::PlanningFallacy).unwrap(), "planning_fallacy");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Major);
        assert!(Severity::Major > Severity::Minor);
    }
}
