// Structural bias rules
// Cognitive biases recognised from graph shape and proposition metadata.
// Statement text is never inspected.

use std::collections::BTreeSet;

use dialectic_logic::parse;
use dialectic_types::{Bias, BiasSeverity, BiasType, Confidence, Proposition, PropositionKind, RelationshipKind};

use crate::centrality::Centrality;
use crate::graph::ArgumentGraph;

fn bias_id(bias: BiasType, n: usize) -> String {
    format!("bias-{}-{}", bias.slug(), n)
}

fn is_challenge(kind: RelationshipKind) -> bool {
    matches!(kind, RelationshipKind::Contradicts | RelationshipKind::Attacks)
}

/// Unsupported assumptions stated as absolutes
pub fn anchoring(graph: &ArgumentGraph<'_>, centrality: &Centrality) -> Vec<Bias> {
    let mut found = Vec::new();
    for node in 0..graph.node_count() {
        let proposition = graph.proposition(node);
        if proposition.kind != PropositionKind::Assumption
            || proposition.confidence != Confidence::UnstatedAsAbsolute
            || graph.incoming(node).any(|e| e.kind == RelationshipKind::Supports)
        {
            continue;
        }
        found.push(Bias {
            id: bias_id(BiasType::Anchoring, found.len() + 1),
            name: "Anchoring Effect".to_string(),
            bias_type: BiasType::Anchoring,
            reference: "Thinking, Fast and Slow, Chapter 11: Anchors".to_string(),
            description: format!(
                "The assumption \"{}\" is stated as an absolute with nothing supporting it. \
                 Later reasoning adjusts relative to this anchor instead of testing it; \
                 consider what evidence would verify it.",
                proposition.display_text()
            ),
            affected_node_ids: graph.ids(&[node]),
            severity: BiasSeverity::from_centrality(centrality.score(node)),
        });
    }
    found
}

/// Claims with two or more supports and no challenge at all
pub fn confirmation(graph: &ArgumentGraph<'_>, centrality: &Centrality) -> Vec<Bias> {
    let mut found = Vec::new();
    for node in 0..graph.node_count() {
        let proposition = graph.proposition(node);
        if proposition.kind != PropositionKind::Claim || graph.incoming(node).any(|e| is_challenge(e.kind)) {
            continue;
        }
        let supports = graph
            .incoming(node)
            .filter(|e| e.kind == RelationshipKind::Supports)
            .count();
        if supports < 2 {
            continue;
        }

        let mut affected = vec![node];
        for edge in graph.incoming(node).filter(|e| e.kind == RelationshipKind::Supports) {
            if !affected.contains(&edge.from) {
                affected.push(edge.from);
            }
        }
        found.push(Bias {
            id: bias_id(BiasType::Confirmation, found.len() + 1),
            name: "Confirmation Bias".to_string(),
            bias_type: BiasType::Confirmation,
            reference: "Thinking, Fast and Slow, Chapter 7: A Machine for Jumping to Conclusions".to_string(),
            description: format!(
                "The claim \"{}\" has {} supporting inputs and nothing contradicting or \
                 attacking it. Only confirming evidence was gathered; a robust argument \
                 addresses the opposing view.",
                proposition.display_text(),
                supports
            ),
            affected_node_ids: graph.ids(&affected),
            severity: BiasSeverity::from_centrality(centrality.score(node)),
        });
    }
    found
}

/// High-confidence load-bearing claims never broken down into dependencies
/// and never checked against a constraint or risk
pub fn planning_fallacy(graph: &ArgumentGraph<'_>, centrality: &Centrality) -> Vec<Bias> {
    let mut found = Vec::new();
    for node in 0..graph.node_count() {
        let proposition = graph.proposition(node);
        if proposition.kind != PropositionKind::Claim
            || !proposition.is_load_bearing
            || proposition.confidence != Confidence::High
        {
            continue;
        }
        let decomposed = graph
            .outgoing(node)
            .any(|e| matches!(e.kind, RelationshipKind::DependsOn | RelationshipKind::Assumes));
        let constrained = graph.incoming(node).any(|e| {
            matches!(
                graph.proposition(e.from).kind,
                PropositionKind::Constraint | PropositionKind::Risk
            )
        });
        if decomposed || constrained {
            continue;
        }
        found.push(Bias {
            id: bias_id(BiasType::PlanningFallacy, found.len() + 1),
            name: "Planning Fallacy".to_string(),
            bias_type: BiasType::PlanningFallacy,
            reference: "Thinking, Fast and Slow, Chapter 23: The Outside View".to_string(),
            description: format!(
                "The claim \"{}\" carries the argument with high confidence but is not \
                 decomposed into dependencies, constraints or risks. Break it into \
                 concrete, measurable sub-goals.",
                proposition.display_text()
            ),
            affected_node_ids: graph.ids(&[node]),
            severity: BiasSeverity::from_centrality(centrality.score(node)),
        });
    }
    found
}

/// Names an expression is about: predicate arguments and bare atoms, with
/// predicate names and single characters skipped. Empty when the expression
/// is absent or does not parse.
fn subjects(proposition: &Proposition) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let Some(expr) = proposition.formal_expression.as_deref().and_then(|text| parse(text).ok()) else {
        return out;
    };
    for atom in expr.atoms() {
        let mut word = String::new();
        for ch in atom.chars().chain(std::iter::once(' ')) {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                continue;
            }
            // a word directly before '(' names a predicate
            if ch != '(' && word.chars().count() > 1 && !matches!(word.as_str(), "true" | "false") {
                out.insert(word.clone());
            }
            word.clear();
        }
    }
    out
}

/// Claims supported by evidence about entirely different subjects, one bias
/// per claim and supporter
pub fn attribute_substitution(graph: &ArgumentGraph<'_>, centrality: &Centrality) -> Vec<Bias> {
    let mut found = Vec::new();
    for node in 0..graph.node_count() {
        let proposition = graph.proposition(node);
        if proposition.kind != PropositionKind::Claim {
            continue;
        }
        let claim_subjects = subjects(proposition);
        if claim_subjects.is_empty() {
            continue;
        }

        for supporter in graph.predecessors(node, |e| e.kind == RelationshipKind::Supports) {
            let evidence = graph.proposition(supporter);
            let evidence_subjects = subjects(evidence);
            if evidence_subjects.is_empty() || !claim_subjects.is_disjoint(&evidence_subjects) {
                continue;
            }
            let list = |set: &BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>().join(", ");
            found.push(Bias {
                id: bias_id(BiasType::AttributeSubstitution, found.len() + 1),
                name: "Attribute Substitution".to_string(),
                bias_type: BiasType::AttributeSubstitution,
                reference: "Thinking, Fast and Slow, Chapter 9: Answering an Easier Question".to_string(),
                description: format!(
                    "The claim \"{}\" is about [{}], but its support \"{}\" is about [{}]. An \
                     easier proxy may be standing in for the actual question.",
                    proposition.display_text(),
                    list(&claim_subjects),
                    evidence.display_text(),
                    list(&evidence_subjects)
                ),
                affected_node_ids: graph.ids(&[node, supporter]),
                severity: BiasSeverity::from_centrality(centrality.score(node)),
            });
        }
    }
    found
}

/// Every structural bias, grouped by rule
pub fn detect_biases(graph: &ArgumentGraph<'_>, centrality: &Centrality) -> Vec<Bias> {
    let mut biases = anchoring(graph, centrality);
    biases.extend(confirmation(graph, centrality));
    biases.extend(planning_fallacy(graph, centrality));
    biases.extend(attribute_substitution(graph, centrality));
    biases
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectic_types::{ArgumentSet, PropositionId, Relationship};

    fn ids(names: &[&str]) -> Vec<PropositionId> {
        names.iter().map(|&name| PropositionId::new(name)).collect()
    }

    #[test]
    fn test_anchoring_needs_absolute_unsupported_assumption() {
        let props = vec![
            Proposition::new("a1", PropositionKind::Assumption).with_confidence(Confidence::UnstatedAsAbsolute),
            Proposition::new("a2", PropositionKind::Assumption).with_confidence(Confidence::UnstatedAsAbsolute),
            Proposition::new("a3", PropositionKind::Assumption).with_confidence(Confidence::High),
            Proposition::new("e1", PropositionKind::Evidence),
        ];
        let rels = vec![Relationship::new("r1", "e1", "a2", RelationshipKind::Supports)];
        let set = ArgumentSet::new(props, rels).0;
        let found = anchoring(&ArgumentGraph::new(&set), &Centrality::zero(4));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "bias-anchoring-1");
        assert_eq!(found[0].affected_node_ids, ids(&["a1"]));
        assert_eq!(found[0].severity, BiasSeverity::Low);
    }

    #[test]
    fn test_confirmation_needs_two_supports_and_no_challenge() {
        let props = vec![
            Proposition::new("c1", PropositionKind::Claim),
            Proposition::new("c2", PropositionKind::Claim),
            Proposition::new("e1", PropositionKind::Evidence),
            Proposition::new("e2", PropositionKind::Evidence),
            Proposition::new("x", PropositionKind::Evidence),
        ];
        let rels = vec![
            Relationship::new("r1", "e1", "c1", RelationshipKind::Supports),
            Relationship::new("r2", "e2", "c1", RelationshipKind::Supports),
            Relationship::new("r3", "e1", "c2", RelationshipKind::Supports),
            Relationship::new("r4", "e2", "c2", RelationshipKind::Supports),
            Relationship::new("r5", "x", "c2", RelationshipKind::Attacks),
        ];
        let set = ArgumentSet::new(props, rels).0;
        let found = confirmation(&ArgumentGraph::new(&set), &Centrality::zero(5));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].affected_node_ids, ids(&["c1", "e1", "e2"]));
    }

    #[test]
    fn test_planning_fallacy_is_cleared_by_decomposition_or_risk() {
        let mut bare = Proposition::new("bare", PropositionKind::Claim).with_confidence(Confidence::High);
        bare.is_load_bearing = true;
        let mut split = bare.clone();
        split.id = "split".into();
        let mut risky = bare.clone();
        risky.id = "risky".into();
        let props = vec![
            bare,
            split,
            risky,
            Proposition::new("step", PropositionKind::Claim),
            Proposition::new("risk", PropositionKind::Risk),
        ];
        let rels = vec![
            Relationship::new("r1", "split", "step", RelationshipKind::DependsOn),
            Relationship::new("r2", "risk", "risky", RelationshipKind::Attacks),
        ];
        let set = ArgumentSet::new(props, rels).0;
        let found = planning_fallacy(&ArgumentGraph::new(&set), &Centrality::zero(5));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].affected_node_ids, ids(&["bare"]));
    }

    #[test]
    fn test_attribute_substitution_compares_subjects() {
        let props = vec![
            Proposition::new("c", PropositionKind::Claim).with_expression("good(outcome_quality)"),
            Proposition::new("proxy", PropositionKind::Evidence).with_expression("large(deal_size)"),
            Proposition::new("direct", PropositionKind::Evidence).with_expression("measured(outcome_quality)"),
            Proposition::new("opaque", PropositionKind::Evidence),
        ];
        let rels = vec![
            Relationship::new("r1", "proxy", "c", RelationshipKind::Supports),
            Relationship::new("r2", "direct", "c", RelationshipKind::Supports),
            Relationship::new("r3", "opaque", "c", RelationshipKind::Supports),
        ];
        let set = ArgumentSet::new(props, rels).0;
        let found = attribute_substitution(&ArgumentGraph::new(&set), &Centrality::zero(4));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].affected_node_ids, ids(&["c", "proxy"]));
        assert!(found[0].description.contains("[outcome_quality]"));
        assert!(found[0].description.contains("[deal_size]"));
    }

    #[test]
    fn test_subjects_skip_predicate_names() {
        let proposition = Proposition::new("p", PropositionKind::Claim)
            .with_expression("time(rebuild) ≥ 12_months → ¬worth(rebuild, x)");
        let found: Vec<String> = subjects(&proposition).into_iter().collect();
        assert_eq!(found, vec!["12_months", "rebuild"]);
    }
}
