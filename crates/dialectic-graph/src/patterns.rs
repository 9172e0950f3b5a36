// Structural fallacy rules
// Each rule maps a graph signature to Fallacy records.

use dialectic_logic::{parse, Expr};
use dialectic_types::{Confidence, Fallacy, PatternType, PropositionKind, RelationshipKind};

use crate::centrality::{dependents, Centrality};
use crate::graph::{ArgumentGraph, Edge};

fn fallacy_id(pattern: PatternType, n: usize) -> String {
    format!("fallacy-{}-{}", pattern.slug(), n)
}

fn quoted(graph: &ArgumentGraph<'_>, nodes: &[usize]) -> Vec<String> {
    nodes
        .iter()
        .map(|&n| format!("\"{}\"", graph.proposition(n).display_text()))
        .collect()
}

/// Circular reasoning, one fallacy per enumerated cycle
pub fn circular_reasoning(graph: &ArgumentGraph<'_>, cycles: &[Vec<usize>]) -> Vec<Fallacy> {
    cycles
        .iter()
        .enumerate()
        .map(|(i, cycle)| {
            let mut path = graph.ids(cycle);
            if let Some(first) = path.first().cloned() {
                path.push(first);
            }
            let mut labels = quoted(graph, cycle);
            if let Some(first) = labels.first().cloned() {
                labels.push(first);
            }
            Fallacy {
                id: fallacy_id(PatternType::Circular, i + 1),
                name: "Circular Reasoning (Petitio Principii)".to_string(),
                pattern_type: PatternType::Circular,
                description: format!(
                    "A circular dependency was detected: {} form a loop in which each \
                     proposition ultimately rests on itself, leaving the argument without \
                     an independent foundation.",
                    labels.join(" → ")
                ),
                affected_node_ids: graph.ids(cycle),
                cycle_path: Some(path),
                dependent_claims: None,
                centrality: None,
            }
        })
        .collect()
}

fn is_evidence_support(graph: &ArgumentGraph<'_>, edge: &Edge) -> bool {
    edge.kind == RelationshipKind::Supports && graph.proposition(edge.from).kind == PropositionKind::Evidence
}

/// High-confidence claims backed by at most one piece of evidence
pub fn hasty_generalizations(graph: &ArgumentGraph<'_>) -> Vec<Fallacy> {
    let mut found = Vec::new();
    for node in 0..graph.node_count() {
        let proposition = graph.proposition(node);
        if proposition.kind != PropositionKind::Claim || proposition.confidence != Confidence::High {
            continue;
        }
        let evidence = graph.predecessors(node, |e| is_evidence_support(graph, e));
        if evidence.len() > 1 {
            continue;
        }

        let backing = match quoted(graph, &evidence).first() {
            Some(label) => format!("a single piece of evidence, {}", label),
            None => "no evidence at all".to_string(),
        };
        let mut affected = vec![node];
        affected.extend(&evidence);
        found.push(Fallacy {
            id: fallacy_id(PatternType::HastyGeneralization, found.len() + 1),
            name: "Hasty Generalization".to_string(),
            pattern_type: PatternType::HastyGeneralization,
            description: format!(
                "The claim \"{}\" is asserted with certainty but rests on {}. Conclusions \
                 held this firmly need several independent lines of evidence.",
                proposition.display_text(),
                backing
            ),
            affected_node_ids: graph.ids(&affected),
            cycle_path: None,
            dependent_claims: None,
            centrality: None,
        });
    }
    found
}

fn is_binary_disjunction(expression: &str) -> bool {
    match parse(expression) {
        Ok(expr @ Expr::Or(..)) => expr.disjuncts().len() == 2,
        _ => false,
    }
}

/// Either-or propositions fed by exactly two support or dependency edges
pub fn false_dilemmas(graph: &ArgumentGraph<'_>) -> Vec<Fallacy> {
    let mut found = Vec::new();
    for node in 0..graph.node_count() {
        let proposition = graph.proposition(node);
        let Some(expression) = proposition.formal_expression.as_deref() else {
            continue;
        };
        let feeding: Vec<&Edge> = graph
            .incoming(node)
            .filter(|e| e.kind.is_support_chain() && !e.is_self_loop())
            .collect();
        if feeding.len() != 2 || !is_binary_disjunction(expression) {
            continue;
        }

        let mut affected = vec![node];
        for edge in &feeding {
            if !affected.contains(&edge.from) {
                affected.push(edge.from);
            }
        }
        found.push(Fallacy {
            id: fallacy_id(PatternType::FalseDilemma, found.len() + 1),
            name: "False Dilemma".to_string(),
            pattern_type: PatternType::FalseDilemma,
            description: format!(
                "\"{}\" frames the question as exactly two options ({}), excluding any \
                 alternative or middle ground.",
                proposition.display_text(),
                expression.trim()
            ),
            affected_node_ids: graph.ids(&affected),
            cycle_path: None,
            dependent_claims: None,
            centrality: None,
        });
    }
    found
}

/// Assumptions whose betweenness exceeds `threshold`
pub fn load_bearing_nodes(graph: &ArgumentGraph<'_>, centrality: &Centrality, threshold: f64) -> Vec<usize> {
    (0..graph.node_count())
        .filter(|&n| graph.proposition(n).kind == PropositionKind::Assumption && centrality.score(n) > threshold)
        .collect()
}

/// One fallacy per load-bearing assumption; `adjacency` is the undirected
/// view the centrality was computed over
pub fn load_bearing_assumptions(
    graph: &ArgumentGraph<'_>,
    adjacency: &[Vec<usize>],
    centrality: &Centrality,
    threshold: f64,
) -> Vec<Fallacy> {
    load_bearing_nodes(graph, centrality, threshold)
        .into_iter()
        .enumerate()
        .map(|(i, node)| {
            let dependents = dependents(adjacency, node);
            let score = centrality.score(node);
            Fallacy {
                id: fallacy_id(PatternType::LoadBearing, i + 1),
                name: "Load-Bearing Assumption".to_string(),
                pattern_type: PatternType::LoadBearing,
                description: format!(
                    "The assumption \"{}\" lies on {:.0}% of the shortest paths through the \
                     argument; {} other proposition(s) are connected only through it.",
                    graph.proposition(node).display_text(),
                    score * 100.0,
                    dependents.len()
                ),
                affected_node_ids: graph.ids(&[node]),
                cycle_path: None,
                dependent_claims: Some(graph.ids(&dependents)),
                centrality: Some(score),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectic_types::{ArgumentSet, Proposition, PropositionId, Relationship};

    fn ids(names: &[&str]) -> Vec<PropositionId> {
        names.iter().map(|&name| PropositionId::new(name)).collect()
    }

    #[test]
    fn test_hasty_needs_high_confidence_and_thin_evidence() {
        let props = vec![
            Proposition::new("c1", PropositionKind::Claim).with_confidence(Confidence::High),
            Proposition::new("c2", PropositionKind::Claim).with_confidence(Confidence::UnstatedAsAbsolute),
            Proposition::new("c3", PropositionKind::Claim).with_confidence(Confidence::Low),
            Proposition::new("e1", PropositionKind::Evidence),
            Proposition::new("e2", PropositionKind::Evidence),
        ];
        let rels = vec![
            Relationship::new("r1", "e1", "c1", RelationshipKind::Supports),
            Relationship::new("r2", "e2", "c2", RelationshipKind::Supports),
        ];
        let set = ArgumentSet::new(props, rels).0;
        let graph = ArgumentGraph::new(&set);
        let found = hasty_generalizations(&graph);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "fallacy-hasty-1");
        assert_eq!(found[0].affected_node_ids, ids(&["c1", "e1"]));
    }

    #[test]
    fn test_false_dilemma_shape() {
        let props = vec![
            Proposition::new("d", PropositionKind::Claim).with_expression("(cut_costs ∨ raise_prices)"),
            Proposition::new("d3", PropositionKind::Claim).with_expression("a ∨ b ∨ c"),
            Proposition::new("x", PropositionKind::Evidence),
            Proposition::new("y", PropositionKind::Evidence),
        ];
        let rels = vec![
            Relationship::new("r1", "x", "d", RelationshipKind::Supports),
            Relationship::new("r2", "y", "d", RelationshipKind::DependsOn),
            Relationship::new("r3", "d", "d", RelationshipKind::Supports),
            Relationship::new("r4", "x", "d3", RelationshipKind::Supports),
            Relationship::new("r5", "y", "d3", RelationshipKind::Supports),
        ];
        let set = ArgumentSet::new(props, rels).0;
        let found = false_dilemmas(&ArgumentGraph::new(&set));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].affected_node_ids, ids(&["d", "x", "y"]));
    }

    #[test]
    fn test_circular_path_is_closed() {
        let props = ["a", "b"].iter().map(|id| Proposition::new(*id, PropositionKind::Claim)).collect();
        let set = ArgumentSet::new(props, vec![]).0;
        let found = circular_reasoning(&ArgumentGraph::new(&set), &[vec![0, 1]]);
        assert_eq!(found[0].cycle_path, Some(ids(&["a", "b", "a"])));
        assert_eq!(found[0].id, "fallacy-circular-1");
    }
}
