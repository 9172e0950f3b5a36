// Betweenness centrality
// Brandes' accumulation over an undirected, unweighted multigraph.

use std::collections::VecDeque;

use dialectic_logic::{Budget, Exhaustion};
use tracing::debug;

/// Normalised betweenness scores
#[derive(Debug, Clone, PartialEq)]
pub struct Centrality {
    scores: Vec<f64>,
}

impl Centrality {
    /// All-zero scores for `n` nodes
    pub fn zero(n: usize) -> Self {
        Self { scores: vec![0.0; n] }
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn score(&self, node: usize) -> f64 {
        self.scores.get(node).copied().unwrap_or(0.0)
    }
}

/// Hop distances from `source`, `None` where unreachable
pub fn distances_from(adjacency: &[Vec<usize>], source: usize) -> Vec<Option<u32>> {
    let mut dist = vec![None; adjacency.len()];
    if source >= adjacency.len() {
        return dist;
    }
    dist[source] = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        let next = dist[v].map_or(0, |d| d + 1);
        for &w in &adjacency[v] {
            if dist[w].is_none() {
                dist[w] = Some(next);
                queue.push_back(w);
            }
        }
    }
    dist
}

/// Nodes that are endpoints of some pair with a shortest path through
/// `via`, ascending
pub fn dependents(adjacency: &[Vec<usize>], via: usize) -> Vec<usize> {
    let n = adjacency.len();
    let from_via = distances_from(adjacency, via);
    let mut dependent = vec![false; n];
    for s in (0..n).filter(|&s| s != via) {
        let Some(to_via) = from_via[s] else {
            continue;
        };
        let from_s = distances_from(adjacency, s);
        for t in (s + 1..n).filter(|&t| t != via) {
            let through = from_via[t].map(|d| d + to_via);
            if through.is_some() && through == from_s[t] {
                dependent[s] = true;
                dependent[t] = true;
            }
        }
    }
    (0..n).filter(|&node| dependent[node]).collect()
}

/// Betweenness of every node of `adjacency`, normalised to `0..=1` by the
/// number of unordered pairs of other nodes. Graphs under three nodes score
/// zero everywhere.
pub fn betweenness(adjacency: &[Vec<usize>], budget: &Budget) -> Result<Centrality, Exhaustion> {
    let n = adjacency.len();
    let mut raw = vec![0.0f64; n];

    for source in 0..n {
        budget.check()?;

        let mut order = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist: Vec<Option<u32>> = vec![None; n];
        sigma[source] = 1.0;
        dist[source] = Some(0);

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            let next_dist = dist[v].map_or(0, |d| d + 1);
            for &w in &adjacency[v] {
                if dist[w].is_none() {
                    dist[w] = Some(next_dist);
                    queue.push_back(w);
                }
                if dist[w] == Some(next_dist) {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        while let Some(w) = order.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                raw[w] += delta[w];
            }
        }
    }

    // each unordered pair is counted from both ends
    let scores = if n < 3 {
        vec![0.0; n]
    } else {
        let pairs = ((n - 1) * (n - 2)) as f64;
        raw.iter().map(|r| (r / pairs).clamp(0.0, 1.0)).collect()
    };

    debug!(nodes = n, "betweenness centrality computed");
    Ok(Centrality { scores })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undirected(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); n];
        for &(a, b) in edges {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        adjacency
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_star_center_is_maximal() {
        let adjacency = undirected(5, &[(0, 4), (1, 4), (2, 4), (3, 4)]);
        let centrality = betweenness(&adjacency, &Budget::default()).unwrap();
        assert!(close(centrality.score(4), 1.0));
        assert!(close(centrality.score(0), 0.0));
    }

    #[test]
    fn test_path_graph() {
        // 0 - 1 - 2 - 3: node 1 lies on (0,2) and (0,3) out of three pairs
        let adjacency = undirected(4, &[(0, 1), (1, 2), (2, 3)]);
        let centrality = betweenness(&adjacency, &Budget::default()).unwrap();
        assert!(close(centrality.score(1), 2.0 / 3.0));
        assert!(close(centrality.score(2), 2.0 / 3.0));
        assert!(close(centrality.score(3), 0.0));
        assert_eq!(distances_from(&adjacency, 0)[3], Some(3));
        assert_eq!(dependents(&adjacency, 1), vec![0, 2, 3]);
    }

    #[test]
    fn test_parallel_edges_split_paths() {
        // two routes from 0 to 3, one doubled
        let adjacency = undirected(4, &[(0, 1), (0, 1), (1, 3), (0, 2), (2, 3)]);
        let centrality = betweenness(&adjacency, &Budget::default()).unwrap();
        assert!(centrality.score(1) > centrality.score(2));
    }

    #[test]
    fn test_small_graphs_score_zero() {
        let centrality = betweenness(&undirected(2, &[(0, 1)]), &Budget::default()).unwrap();
        assert_eq!(centrality.scores(), &[0.0, 0.0]);
        assert_eq!(Centrality::zero(3).scores(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dependents_skip_disconnected_nodes() {
        // 0 - 1 - 2 and an isolated 3
        let adjacency = undirected(4, &[(0, 1), (1, 2)]);
        assert_eq!(dependents(&adjacency, 1), vec![0, 2]);
        assert!(dependents(&adjacency, 3).is_empty());
        assert_eq!(distances_from(&adjacency, 3), vec![None, None, None, Some(0)]);
    }
}
