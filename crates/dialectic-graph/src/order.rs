// Dependency order
// Kahn's algorithm over supports/depends_on/assumes edges.

use std::collections::BTreeSet;

use crate::graph::ArgumentGraph;

/// Nodes in dependency order, lowest input index first among ready nodes.
///
/// Nodes on a cycle, and nodes only reachable through one, never become
/// ready and are left out.
pub fn dependency_order(graph: &ArgumentGraph<'_>) -> Vec<usize> {
    let n = graph.node_count();
    let mut in_degree = vec![0usize; n];
    for edge in graph.edges().iter().filter(|e| e.kind.is_dependency()) {
        in_degree[edge.to] += 1;
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&node| in_degree[node] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(node) = ready.pop_first() {
        order.push(node);
        for edge in graph.outgoing(node).filter(|e| e.kind.is_dependency()) {
            in_degree[edge.to] -= 1;
            if in_degree[edge.to] == 0 {
                ready.insert(edge.to);
            }
        }
    }
    order
}
