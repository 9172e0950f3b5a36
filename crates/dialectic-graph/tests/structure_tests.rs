//! Structural analysis over whole argument sets

use std::collections::BTreeSet;

use dialectic_graph::{analyze_structure, find_cycles, GraphOptions};
use dialectic_logic::Budget;
use dialectic_types::{
    ArgumentSet, Confidence, PatternType, Proposition, PropositionId, PropositionKind, Relationship,
    RelationshipKind,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn ids(list: &[&str]) -> Vec<PropositionId> {
    list.iter().map(|&id| id.into()).collect()
}

#[test]
fn test_support_loop_is_one_circular_fallacy() {
    let props = ["A", "B", "C"]
        .iter()
        .map(|id| Proposition::new(*id, PropositionKind::Claim))
        .collect();
    let rels = vec![
        Relationship::new("r1", "A", "B", RelationshipKind::Supports),
        Relationship::new("r2", "B", "C", RelationshipKind::Supports),
        Relationship::new("r3", "C", "A", RelationshipKind::Supports),
    ];
    let set = ArgumentSet::new(props, rels).0;
    let analysis = analyze_structure(&set, &GraphOptions::default(), &Budget::default());

    let circular: Vec<_> = analysis
        .fallacies
        .iter()
        .filter(|f| f.pattern_type == PatternType::Circular)
        .collect();
    assert_eq!(circular.len(), 1);
    assert_eq!(circular[0].cycle_path, Some(ids(&["A", "B", "C", "A"])));
    assert!(analysis.dependency_order.is_empty());
    assert!(!analysis.degraded);
}

#[test]
fn test_unsupported_certain_claim_is_hasty() {
    let props = vec![
        Proposition::new("claim", PropositionKind::Claim)
            .with_statement("Remote work always lowers productivity")
            .with_confidence(Confidence::High),
        Proposition::new("aside", PropositionKind::Assumption),
    ];
    let set = ArgumentSet::new(props, vec![]).0;
    let analysis = analyze_structure(&set, &GraphOptions::default(), &Budget::default());

    assert_eq!(analysis.fallacies.len(), 1);
    let fallacy = &analysis.fallacies[0];
    assert_eq!(fallacy.pattern_type, PatternType::HastyGeneralization);
    assert_eq!(fallacy.affected_node_ids, ids(&["claim"]));
    assert!(fallacy.description.contains("Remote work always lowers productivity"));
}

#[test]
fn test_hub_assumption_is_load_bearing() {
    let mut props = vec![Proposition::new("hub", PropositionKind::Assumption)];
    let mut rels = Vec::new();
    for i in 0..4 {
        let id = format!("c{}", i);
        props.push(Proposition::new(id.as_str(), PropositionKind::Claim));
        rels.push(Relationship::new(format!("r{}", i), id.as_str(), "hub", RelationshipKind::DependsOn));
    }
    let set = ArgumentSet::new(props, rels).0;
    let analysis = analyze_structure(&set, &GraphOptions::default(), &Budget::default());

    let load_bearing: Vec<_> = analysis
        .fallacies
        .iter()
        .filter(|f| f.pattern_type == PatternType::LoadBearing)
        .collect();
    assert_eq!(load_bearing.len(), 1);
    assert_eq!(load_bearing[0].centrality, Some(1.0));
    assert_eq!(load_bearing[0].dependent_claims, Some(ids(&["c0", "c1", "c2", "c3"])));
    assert_eq!(analysis.load_bearing, vec![true, false, false, false, false]);
}

#[test]
fn test_cycle_count_limit_degrades() {
    let names = ["a", "b", "c", "d"];
    let props = names.iter().map(|id| Proposition::new(*id, PropositionKind::Claim)).collect();
    let mut rels = Vec::new();
    for from in names {
        for to in names.iter().filter(|&&to| to != from) {
            rels.push(Relationship::new(format!("{}{}", from, to), from, *to, RelationshipKind::Supports));
        }
    }
    let set = ArgumentSet::new(props, rels).0;
    let options = GraphOptions {
        max_cycles: 3,
        ..GraphOptions::default()
    };
    let analysis = analyze_structure(&set, &options, &Budget::default());
    assert!(analysis.degraded);
    assert_eq!(analysis.fallacies.iter().filter(|f| f.pattern_type == PatternType::Circular).count(), 3);
    assert_eq!(analysis.warnings.len(), 1);
}

/// Every elementary cycle, by brute-force path extension, in canonical
/// rotation
fn brute_force_cycles(adjacency: &[Vec<usize>], max_len: usize) -> BTreeSet<Vec<usize>> {
    fn extend(adjacency: &[Vec<usize>], path: &mut Vec<usize>, max_len: usize, out: &mut BTreeSet<Vec<usize>>) {
        let start = path[0];
        let last = path[path.len() - 1];
        for &next in &adjacency[last] {
            if next == start && path.len() >= 2 {
                out.insert(path.clone());
            } else if next > start && !path.contains(&next) && path.len() < max_len {
                path.push(next);
                extend(adjacency, path, max_len, out);
                path.pop();
            }
        }
    }
    let mut out = BTreeSet::new();
    for start in 0..adjacency.len() {
        extend(adjacency, &mut vec![start], max_len, &mut out);
    }
    out
}

fn adjacency_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..7).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::btree_set(0..n, 0..n), n).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(from, targets)| targets.into_iter().filter(|&to| to != from).collect())
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn cycles_match_brute_force(adjacency in adjacency_strategy(), max_len in 2usize..7) {
        let search = find_cycles(&adjacency, max_len, usize::MAX, &Budget::default());
        prop_assert!(search.is_complete());
        let found: BTreeSet<Vec<usize>> = search.cycles.iter().cloned().collect();
        prop_assert_eq!(found.len(), search.cycles.len());
        prop_assert_eq!(found, brute_force_cycles(&adjacency, max_len));
    }
}
