//! Bounded elementary-cycle enumeration
//!
//! Johnson's algorithm over the support-chain graph. For each start node
//! `s`, in index order, the search is confined to the strongly connected
//! component of `s` within the nodes `>= s`, so every cycle is found exactly
//! once, from its lowest-index node. Paths are cut at `max_len` nodes; a cut
//! counts as a success for unblocking, so no cycle within the bound is lost.

use std::collections::BTreeSet;

use dialectic_logic::{Budget, Exhaustion};
use tracing::debug;

/// Enumerated cycles, each starting at its lowest-index node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSearch {
    pub cycles: Vec<Vec<usize>>,
    /// Stopped at the cycle count limit
    pub truncated: bool,
    /// Stopped by the deadline or cancellation
    pub exhausted: Option<Exhaustion>,
}

impl CycleSearch {
    pub fn is_complete(&self) -> bool {
        !self.truncated && self.exhausted.is_none()
    }
}

/// Enumerate elementary cycles of at most `max_len` nodes, up to
/// `max_cycles` of them. Self-loops are ignored.
pub fn find_cycles(adjacency: &[Vec<usize>], max_len: usize, max_cycles: usize, budget: &Budget) -> CycleSearch {
    let n = adjacency.len();
    let mut reverse = vec![Vec::new(); n];
    for (from, targets) in adjacency.iter().enumerate() {
        for &to in targets {
            if to != from {
                reverse[to].push(from);
            }
        }
    }

    let mut johnson = Johnson {
        adjacency,
        component: vec![false; n],
        blocked: vec![false; n],
        blocked_by: vec![BTreeSet::new(); n],
        stack: Vec::new(),
        start: 0,
        max_len,
        max_cycles,
        budget,
        search: CycleSearch::default(),
    };

    if max_len >= 2 && max_cycles > 0 {
        for start in 0..n {
            let component = component_of(adjacency, &reverse, start);
            if component.iter().filter(|&&member| member).count() < 2 {
                continue;
            }
            johnson.reset(start, component);
            match johnson.circuit(start) {
                Ok(_) => {}
                Err(exhaustion) => {
                    johnson.search.exhausted = Some(exhaustion);
                    break;
                }
            }
            if johnson.search.truncated {
                break;
            }
        }
    }

    debug!(
        nodes = n,
        cycles = johnson.search.cycles.len(),
        truncated = johnson.search.truncated,
        exhausted = johnson.search.exhausted.is_some(),
        "cycle enumeration finished"
    );
    johnson.search
}

/// Strongly connected component of `start` among nodes `>= start`
fn component_of(adjacency: &[Vec<usize>], reverse: &[Vec<usize>], start: usize) -> Vec<bool> {
    let reach = |edges: &[Vec<usize>]| {
        let mut seen = vec![false; edges.len()];
        let mut pending = vec![start];
        seen[start] = true;
        while let Some(node) = pending.pop() {
            for &next in &edges[node] {
                if next >= start && !seen[next] {
                    seen[next] = true;
                    pending.push(next);
                }
            }
        }
        seen
    };
    let forward = reach(adjacency);
    let backward = reach(reverse);
    forward.iter().zip(&backward).map(|(&f, &b)| f && b).collect()
}

struct Johnson<'g> {
    adjacency: &'g [Vec<usize>],
    component: Vec<bool>,
    blocked: Vec<bool>,
    blocked_by: Vec<BTreeSet<usize>>,
    stack: Vec<usize>,
    start: usize,
    max_len: usize,
    max_cycles: usize,
    budget: &'g Budget,
    search: CycleSearch,
}

impl<'g> Johnson<'g> {
    fn reset(&mut self, start: usize, component: Vec<bool>) {
        self.start = start;
        self.component = component;
        self.blocked.iter_mut().for_each(|b| *b = false);
        self.blocked_by.iter_mut().for_each(BTreeSet::clear);
        self.stack.clear();
    }

    fn unblock(&mut self, node: usize) {
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if self.blocked[current] {
                self.blocked[current] = false;
                pending.extend(std::mem::take(&mut self.blocked_by[current]));
            }
        }
    }

    /// True when a cycle (or a length cut) was reached below `node`
    fn circuit(&mut self, node: usize) -> Result<bool, Exhaustion> {
        self.budget.check()?;
        let mut closed = false;
        self.stack.push(node);
        self.blocked[node] = true;

        let adjacency = self.adjacency;
        for &next in &adjacency[node] {
            if self.search.truncated {
                break;
            }
            if !self.component[next] {
                continue;
            }
            if next == self.start {
                self.search.cycles.push(self.stack.clone());
                closed = true;
                if self.search.cycles.len() >= self.max_cycles {
                    self.search.truncated = true;
                }
            } else if !self.blocked[next] {
                if self.stack.len() >= self.max_len || self.circuit(next)? {
                    closed = true;
                }
            }
        }

        if closed {
            self.unblock(node);
        } else {
            for &next in &adjacency[node] {
                if self.component[next] {
                    self.blocked_by[next].insert(node);
                }
            }
        }
        self.stack.pop();
        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectic_logic::CancellationToken;
    use pretty_assertions::assert_eq;

    fn run(adjacency: &[Vec<usize>], max_len: usize) -> Vec<Vec<usize>> {
        find_cycles(adjacency, max_len, 256, &Budget::default()).cycles
    }

    #[test]
    fn test_triangle() {
        assert_eq!(run(&[vec![1], vec![2], vec![0]], 8), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_overlapping_cycles() {
        // 0 -> 1 -> 0 and 0 -> 1 -> 2 -> 0
        let adjacency = vec![vec![1], vec![0, 2], vec![0]];
        assert_eq!(run(&adjacency, 8), vec![vec![0, 1], vec![0, 1, 2]]);
        assert_eq!(run(&adjacency, 2), vec![vec![0, 1]]);
    }

    #[test]
    fn test_complete_graph_counts() {
        // K4 has 20 elementary cycles: 6 of length 2, 8 of length 3, 6 of length 4
        let adjacency: Vec<Vec<usize>> = (0..4).map(|i| (0..4).filter(|&j| j != i).collect()).collect();
        assert_eq!(run(&adjacency, 8).len(), 20);
        assert_eq!(run(&adjacency, 3).len(), 14);
    }

    #[test]
    fn test_acyclic_and_self_loops() {
        assert!(run(&[vec![1, 2], vec![2], vec![]], 8).is_empty());
        assert!(run(&[vec![0]], 8).is_empty());
    }

    #[test]
    fn test_count_limit_truncates() {
        let adjacency: Vec<Vec<usize>> = (0..4).map(|i| (0..4).filter(|&j| j != i).collect()).collect();
        let search = find_cycles(&adjacency, 8, 5, &Budget::default());
        assert_eq!(search.cycles.len(), 5);
        assert!(search.truncated);
        assert!(!search.is_complete());
    }

    #[test]
    fn test_cancellation_stops_search() {
        let token = CancellationToken::new();
        token.cancel();
        let search = find_cycles(&[vec![1], vec![0]], 8, 256, &Budget::unlimited(token));
        assert_eq!(search.exhausted, Some(Exhaustion::Cancelled));
        assert!(search.cycles.is_empty());
    }
}
