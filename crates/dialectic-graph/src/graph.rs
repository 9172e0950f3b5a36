// Relationship graph
// Index-based adjacency over a validated argument set.

use dialectic_types::{ArgumentSet, Proposition, PropositionId, RelationshipKind, Strength};

/// One typed edge; endpoints are proposition input indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub kind: RelationshipKind,
    pub strength: Strength,
    /// Input index of the relationship
    pub relationship: usize,
}

impl Edge {
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Directed multigraph of an argument set.
///
/// Node `i` is the proposition at input index `i`. Duplicate edges and
/// self-loops are kept; each algorithm decides how to treat them.
#[derive(Debug, Clone)]
pub struct ArgumentGraph<'a> {
    set: &'a ArgumentSet,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl<'a> ArgumentGraph<'a> {
    pub fn new(set: &'a ArgumentSet) -> Self {
        let n = set.len();
        let mut graph = Self {
            set,
            edges: Vec::with_capacity(set.relationships().len()),
            outgoing: vec![Vec::new(); n],
            incoming: vec![Vec::new(); n],
        };
        for (position, relationship) in set.relationships().iter().enumerate() {
            let (Some(from), Some(to)) = (
                set.index_of(&relationship.from_id),
                set.index_of(&relationship.to_id),
            ) else {
                continue;
            };
            let index = graph.edges.len();
            graph.edges.push(Edge {
                from,
                to,
                kind: relationship.kind,
                strength: relationship.strength,
                relationship: position,
            });
            graph.outgoing[from].push(index);
            graph.incoming[to].push(index);
        }
        graph
    }

    pub fn set(&self) -> &'a ArgumentSet {
        self.set
    }

    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn proposition(&self, node: usize) -> &'a Proposition {
        &self.set.propositions()[node]
    }

    pub fn id(&self, node: usize) -> &'a PropositionId {
        &self.proposition(node).id
    }

    /// Ids of `nodes`, in the given order
    pub fn ids(&self, nodes: &[usize]) -> Vec<PropositionId> {
        nodes.iter().map(|&n| self.id(n).clone()).collect()
    }

    /// Edges leaving `node`, in input order
    pub fn outgoing(&self, node: usize) -> impl Iterator<Item = &Edge> {
        self.outgoing[node].iter().map(move |&e| &self.edges[e])
    }

    /// Edges entering `node`, in input order
    pub fn incoming(&self, node: usize) -> impl Iterator<Item = &Edge> {
        self.incoming[node].iter().map(move |&e| &self.edges[e])
    }

    /// Distinct predecessors of `node` over edges accepted by `keep`,
    /// self-loops excluded, ascending
    pub fn predecessors(&self, node: usize, keep: impl Fn(&Edge) -> bool) -> Vec<usize> {
        let mut nodes: Vec<usize> = self
            .incoming(node)
            .filter(|e| !e.is_self_loop() && keep(e))
            .map(|e| e.from)
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Simple directed adjacency over `supports`/`depends_on` edges, without
    /// self-loops, neighbours ascending
    pub fn support_chain_adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.node_count()];
        for edge in &self.edges {
            if edge.kind.is_support_chain() && !edge.is_self_loop() {
                adjacency[edge.from].push(edge.to);
            }
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
            neighbours.dedup();
        }
        adjacency
    }

    /// Undirected adjacency over every edge kind; parallel edges repeat the
    /// neighbour, self-loops are dropped
    pub fn undirected_adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.node_count()];
        for edge in self.edges.iter().filter(|e| !e.is_self_loop()) {
            adjacency[edge.from].push(edge.to);
            adjacency[edge.to].push(edge.from);
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
        }
        adjacency
    }
}
