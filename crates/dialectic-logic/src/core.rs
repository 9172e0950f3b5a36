// Minimal unsatisfiable cores
// Deletion-based minimisation grouped by proposition.

use std::collections::BTreeSet;

use dialectic_types::Satisfiability;
use tracing::{debug, warn};

use crate::budget::{Budget, Exhaustion};
use crate::encoder::Encoding;
use crate::solver::{solve, Refutation, SolveOutcome};

/// Result of searching an encoding for contradictions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContradictionSearch {
    pub satisfiability: Satisfiability,
    /// Pairwise disjoint minimal cores, as proposition input indices
    pub cores: Vec<BTreeSet<usize>>,
    /// Set when a search stopped early; cores found before that are kept
    pub exhausted: Option<Exhaustion>,
}

/// Solve the sub-formula owned by `members`
pub fn solve_members(encoding: &Encoding, members: &BTreeSet<usize>, budget: &Budget) -> (SolveOutcome, Vec<usize>) {
    let (clauses, map) = encoding.restrict(members);
    (solve(encoding.num_vars(), &clauses, budget), map)
}

/// Shrink an unsatisfiable member set to a subset-minimal core.
///
/// `refutation` and `clause_map` come from solving `members`; the
/// propositions tagged on the refutation's clauses seed the candidate when
/// they are already unsatisfiable on their own.
pub fn minimal_core(
    encoding: &Encoding,
    members: &BTreeSet<usize>,
    refutation: &Refutation,
    clause_map: &[usize],
    budget: &Budget,
) -> Result<BTreeSet<usize>, Exhaustion> {
    let seed: BTreeSet<usize> = refutation
        .clauses
        .iter()
        .filter_map(|&local| clause_map.get(local))
        .flat_map(|&global| encoding.clauses[global].tags.iter().copied())
        .collect();

    let mut candidate = if seed.is_empty() || &seed == members {
        members.clone()
    } else {
        match solve_members(encoding, &seed, budget).0 {
            SolveOutcome::Unsat(_) => seed,
            SolveOutcome::Sat(_) => members.clone(),
            SolveOutcome::Unknown(exhaustion) => return Err(exhaustion),
        }
    };
    let contributing = encoding.contributing();
    candidate.retain(|p| contributing.contains(p));

    let mut solver_calls = 0usize;
    for member in candidate.clone() {
        budget.check()?;
        let trial: BTreeSet<usize> = candidate.iter().copied().filter(|&p| p != member).collect();

        let owns_clause = encoding
            .clauses
            .iter()
            .any(|c| c.tags.contains(&member) && c.tags.iter().all(|t| candidate.contains(t)));
        if !owns_clause {
            candidate = trial;
            continue;
        }

        solver_calls += 1;
        match solve_members(encoding, &trial, budget).0 {
            SolveOutcome::Unsat(_) => candidate = trial,
            SolveOutcome::Sat(_) => {}
            SolveOutcome::Unknown(exhaustion) => return Err(exhaustion),
        }
    }

    debug!(
        members = members.len(),
        core = candidate.len(),
        solver_calls,
        "minimised unsatisfiable core"
    );
    Ok(candidate)
}

/// Decide the whole encoding and extract up to `max_cores` disjoint cores.
///
/// After each core its propositions are withdrawn and the remainder is
/// solved again.
pub fn find_contradictions(encoding: &Encoding, budget: &Budget, max_cores: usize) -> ContradictionSearch {
    let mut active: BTreeSet<usize> = (0..encoding.proposition_count()).collect();
    let mut search = ContradictionSearch {
        satisfiability: Satisfiability::Sat,
        cores: Vec::new(),
        exhausted: None,
    };

    let (mut outcome, mut map) = solve_members(encoding, &active, budget);
    loop {
        let refutation = match outcome {
            SolveOutcome::Sat(_) => break,
            SolveOutcome::Unknown(exhaustion) => {
                if search.cores.is_empty() {
                    search.satisfiability = Satisfiability::Unknown;
                }
                search.exhausted = Some(exhaustion);
                break;
            }
            SolveOutcome::Unsat(refutation) => refutation,
        };
        search.satisfiability = Satisfiability::Unsat;
        if search.cores.len() >= max_cores {
            break;
        }

        match minimal_core(encoding, &active, &refutation, &map, budget) {
            Ok(core) => {
                active.retain(|p| !core.contains(p));
                search.cores.push(core);
            }
            Err(exhaustion) => {
                warn!(%exhaustion, "core extraction stopped before reaching a minimal core");
                search.exhausted = Some(exhaustion);
                break;
            }
        }
        if search.cores.len() >= max_cores {
            break;
        }

        (outcome, map) = solve_members(encoding, &active, budget);
    }

    debug!(
        satisfiability = %search.satisfiability,
        cores = search.cores.len(),
        exhausted = search.exhausted.is_some(),
        "contradiction search finished"
    );
    search
}
