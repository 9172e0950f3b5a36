// Argument scoring
//
// score = clamp(e / (e + 1) - 0.3 * contradictions - 0.2 * vulnerable
//               + 0.1 * centrality, 0, 1)
// where e counts incoming supports edges.

use dialectic_types::{Contradiction, PropositionAnnotation, RelationshipKind};

use crate::centrality::Centrality;
use crate::graph::ArgumentGraph;

const CONTRADICTION_PENALTY: f64 = 0.3;
const VULNERABLE_PENALTY: f64 = 0.2;
const CENTRALITY_BONUS: f64 = 0.1;

/// Load-bearing assumptions without support, reached from `node` over a
/// depends_on/assumes edge in either direction; input order
fn vulnerable_assumptions(graph: &ArgumentGraph<'_>, node: usize, load_bearing: &[bool]) -> Vec<usize> {
    let linked = |kind: RelationshipKind| matches!(kind, RelationshipKind::DependsOn | RelationshipKind::Assumes);
    let mut neighbours: Vec<usize> = graph
        .outgoing(node)
        .filter(|e| linked(e.kind))
        .map(|e| e.to)
        .chain(graph.incoming(node).filter(|e| linked(e.kind)).map(|e| e.from))
        .filter(|&other| other != node && load_bearing[other])
        .filter(|&other| graph.incoming(other).all(|e| e.kind != RelationshipKind::Supports))
        .collect();
    neighbours.sort_unstable();
    neighbours.dedup();
    neighbours
}

/// Annotate every proposition, in input order
pub fn annotate(
    graph: &ArgumentGraph<'_>,
    centrality: &Centrality,
    load_bearing: &[bool],
    contradictions: &[Contradiction],
) -> Vec<PropositionAnnotation> {
    (0..graph.node_count())
        .map(|node| {
            let id = graph.id(node);
            let evidence_paths = graph
                .incoming(node)
                .filter(|e| e.kind == RelationshipKind::Supports)
                .count();
            let contradiction_count = contradictions
                .iter()
                .filter(|c| c.minimal_core.contains(id))
                .count();
            let vulnerable = vulnerable_assumptions(graph, node, load_bearing);

            let e = evidence_paths as f64;
            let score = (e / (e + 1.0)
                - CONTRADICTION_PENALTY * contradiction_count as f64
                - VULNERABLE_PENALTY * vulnerable.len() as f64
                + CENTRALITY_BONUS * centrality.score(node))
            .clamp(0.0, 1.0);

            PropositionAnnotation {
                proposition_id: id.clone(),
                centrality: centrality.score(node),
                load_bearing: load_bearing.get(node).copied().unwrap_or(false),
                evidence_paths,
                contradiction_count,
                vulnerable_assumptions: graph.ids(&vulnerable),
                score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectic_types::{
        ArgumentSet, FormalProof, Proposition, PropositionId, PropositionKind, Relationship,
        Severity,
    };

    fn ids(names: &[&str]) -> Vec<PropositionId> {
        names.iter().map(|&name| PropositionId::new(name)).collect()
    }

    fn contradiction(core: &[&str]) -> Contradiction {
        Contradiction {
            id: "contradiction-1".to_string(),
            proposition_ids: core.iter().map(|&id| id.into()).collect(),
            minimal_core: core.iter().map(|&id| id.into()).collect(),
            severity: Severity::Major,
            formal_proof: FormalProof::from_lines(vec![]),
            human_explanation: String::new(),
        }
    }

    #[test]
    fn test_scores_follow_the_formula() {
        let props = vec![
            Proposition::new("claim", PropositionKind::Claim),
            Proposition::new("e1", PropositionKind::Evidence),
            Proposition::new("e2", PropositionKind::Evidence),
            Proposition::new("base", PropositionKind::Assumption),
        ];
        let rels = vec![
            Relationship::new("r1", "e1", "claim", RelationshipKind::Supports),
            Relationship::new("r2", "e2", "claim", RelationshipKind::Supports),
            Relationship::new("r3", "claim", "base", RelationshipKind::DependsOn),
        ];
        let set = ArgumentSet::new(props, rels).0;
        let graph = ArgumentGraph::new(&set);
        let centrality = Centrality::zero(4);
        let load_bearing = [false, false, false, true];

        let annotations = annotate(&graph, &centrality, &load_bearing, &[contradiction(&["e1"])]);
        assert_eq!(annotations[0].evidence_paths, 2);
        assert_eq!(annotations[0].vulnerable_assumptions, ids(&["base"]));
        assert!((annotations[0].score - (2.0 / 3.0 - 0.2)).abs() < 1e-9);
        assert_eq!(annotations[1].contradiction_count, 1);
        assert_eq!(annotations[1].score, 0.0);
        assert!(annotations[3].load_bearing);
    }
}
