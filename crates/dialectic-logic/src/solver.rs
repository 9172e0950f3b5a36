//! DPLL satisfiability search
//!
//! Unit propagation to fixpoint (clauses scanned in index order), pure
//! literal elimination (variables in creation order), then a split on the
//! unassigned variable occurring most often in unsatisfied clauses, lowest
//! variable on ties, more frequent polarity first, positive on ties. Both
//! polarities are explored with backtracking. The budget is charged once per
//! decision node. Given the same clauses the search, its result and its
//! trace are identical on every run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::budget::{Budget, Exhaustion};
use crate::cnf::{Clause, Lit, Var};

/// A complete assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub fn value(&self, var: Var) -> bool {
        self.values.get(var.index()).copied().unwrap_or(false)
    }

    pub fn lit_value(&self, lit: Lit) -> bool {
        self.value(lit.var()) == lit.is_positive()
    }

    pub fn satisfies(&self, clause: &Clause) -> bool {
        clause.lits().iter().any(|&lit| self.lit_value(lit))
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }
}

/// Evidence of unsatisfiability: indices of the clauses used in conflicts
/// and propagations
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Refutation {
    pub clauses: Vec<usize>,
}

/// Result of a bounded search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Sat(Model),
    Unsat(Refutation),
    Unknown(Exhaustion),
}

impl SolveOutcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveOutcome::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, SolveOutcome::Unsat(_))
    }
}

/// One step of the search, recorded when tracing is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Case split; `level` is the depth of the new case
    Decision { lit: u32, level: usize },
    /// `lit` forced by the clause at index `clause`
    Propagation { lit: u32, clause: usize },
    PureLiteral { lit: u32, level: usize },
    /// Every literal of the clause at index `clause` is false
    Conflict { clause: usize },
    /// Undo the case opened at `level + 1`
    Backtrack { level: usize },
    /// Both polarities of `var` failed at `level`
    Exhausted { var: u32, level: usize },
}

/// Search options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    pub pure_literals: bool,
    pub trace: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            pure_literals: true,
            trace: false,
        }
    }
}

/// Decide satisfiability of `clauses`
pub fn solve(num_vars: usize, clauses: &[Clause], budget: &Budget) -> SolveOutcome {
    Solver::new(num_vars, clauses, budget, SolverOptions::default()).run()
}

/// Decide satisfiability and return the search trace
pub fn solve_traced(num_vars: usize, clauses: &[Clause], budget: &Budget) -> (SolveOutcome, Vec<TraceEvent>) {
    let options = SolverOptions {
        trace: true,
        ..SolverOptions::default()
    };
    let mut solver = Solver::new(num_vars, clauses, budget, options);
    let outcome = solver.run_inner();
    (outcome, solver.trace)
}

enum ClauseState {
    Satisfied,
    Unit(Lit),
    Conflict,
    Open,
}

/// DPLL search state over one clause set
pub struct Solver<'a> {
    clauses: &'a [Clause],
    assignment: Vec<Option<bool>>,
    trail: Vec<Lit>,
    budget: &'a Budget,
    options: SolverOptions,
    trace: Vec<TraceEvent>,
    involved: BTreeSet<usize>,
    decisions: u64,
    propagations: u64,
    conflicts: u64,
}

impl<'a> Solver<'a> {
    pub fn new(num_vars: usize, clauses: &'a [Clause], budget: &'a Budget, options: SolverOptions) -> Self {
        let used = clauses
            .iter()
            .flat_map(|c| c.lits())
            .map(|lit| lit.var().index() + 1)
            .max()
            .unwrap_or(0);
        Self {
            clauses,
            assignment: vec![None; num_vars.max(used)],
            trail: Vec::new(),
            budget,
            options,
            trace: Vec::new(),
            involved: BTreeSet::new(),
            decisions: 0,
            propagations: 0,
            conflicts: 0,
        }
    }

    pub fn run(mut self) -> SolveOutcome {
        self.run_inner()
    }

    fn run_inner(&mut self) -> SolveOutcome {
        let outcome = match self.search() {
            Ok(true) => SolveOutcome::Sat(Model {
                values: self.assignment.iter().map(|v| v.unwrap_or(false)).collect(),
            }),
            Ok(false) => SolveOutcome::Unsat(Refutation {
                clauses: self.involved.iter().copied().collect(),
            }),
            Err(exhaustion) => SolveOutcome::Unknown(exhaustion),
        };
        debug!(
            clauses = self.clauses.len(),
            vars = self.assignment.len(),
            decisions = self.decisions,
            propagations = self.propagations,
            conflicts = self.conflicts,
            sat = outcome.is_sat(),
            unsat = outcome.is_unsat(),
            "dpll search finished"
        );
        outcome
    }

    fn record(&mut self, event: TraceEvent) {
        if self.options.trace {
            self.trace.push(event);
        }
    }

    fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.assignment[lit.var().index()].map(|v| v == lit.is_positive())
    }

    fn assign(&mut self, lit: Lit) {
        self.assignment[lit.var().index()] = Some(lit.is_positive());
        self.trail.push(lit);
    }

    fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(lit) = self.trail.pop() {
                self.assignment[lit.var().index()] = None;
            }
        }
    }

    fn state(&self, clause: &Clause) -> ClauseState {
        let mut unassigned = None;
        let mut open = 0;
        for &lit in clause.lits() {
            match self.lit_value(lit) {
                Some(true) => return ClauseState::Satisfied,
                Some(false) => {}
                None => {
                    open += 1;
                    unassigned = Some(lit);
                }
            }
        }
        match (open, unassigned) {
            (0, _) => ClauseState::Conflict,
            (1, Some(lit)) => ClauseState::Unit(lit),
            _ => ClauseState::Open,
        }
    }

    /// Unit propagation to fixpoint; false on conflict
    fn propagate(&mut self) -> bool {
        loop {
            let mut changed = false;
            for index in 0..self.clauses.len() {
                match self.state(&self.clauses[index]) {
                    ClauseState::Satisfied | ClauseState::Open => {}
                    ClauseState::Unit(lit) => {
                        self.assign(lit);
                        self.propagations += 1;
                        self.involved.insert(index);
                        self.record(TraceEvent::Propagation { lit: lit.code(), clause: index });
                        changed = true;
                    }
                    ClauseState::Conflict => {
                        self.conflicts += 1;
                        self.involved.insert(index);
                        self.record(TraceEvent::Conflict { clause: index });
                        return false;
                    }
                }
            }
            if !changed {
                return true;
            }
        }
    }

    /// Occurrences of each unassigned variable in unsatisfied clauses,
    /// as (positive, negative)
    fn occurrences(&self) -> Vec<(usize, usize)> {
        let mut counts = vec![(0, 0); self.assignment.len()];
        for clause in self.clauses {
            if matches!(self.state(clause), ClauseState::Satisfied) {
                continue;
            }
            for &lit in clause.lits() {
                if self.lit_value(lit).is_none() {
                    let entry = &mut counts[lit.var().index()];
                    if lit.is_positive() {
                        entry.0 += 1;
                    } else {
                        entry.1 += 1;
                    }
                }
            }
        }
        counts
    }

    fn assign_pure_literals(&mut self, level: usize) {
        let counts = self.occurrences();
        for (index, &(pos, neg)) in counts.iter().enumerate() {
            let pure = match (pos, neg) {
                (0, 0) => None,
                (_, 0) => Some(true),
                (0, _) => Some(false),
                _ => None,
            };
            if let Some(positive) = pure {
                let lit = Lit::new(Var(index as u32), positive);
                self.assign(lit);
                self.record(TraceEvent::PureLiteral { lit: lit.code(), level });
            }
        }
    }

    /// Branch literal, or `None` when every clause is satisfied
    fn pick_branch(&self) -> Option<Lit> {
        let counts = self.occurrences();
        let mut best: Option<(usize, usize)> = None;
        for (index, &(pos, neg)) in counts.iter().enumerate() {
            let total = pos + neg;
            if total > 0 && best.map_or(true, |(_, best_total)| total > best_total) {
                best = Some((index, total));
            }
        }
        best.map(|(index, _)| {
            let (pos, neg) = counts[index];
            Lit::new(Var(index as u32), pos >= neg)
        })
    }

    fn decide(&mut self, lit: Lit, level: usize) {
        self.decisions += 1;
        self.record(TraceEvent::Decision { lit: lit.code(), level });
        self.assign(lit);
    }

    /// Depth-first search over an explicit stack of open case splits; the
    /// split for the node at level `n` sits at index `n`
    fn search(&mut self) -> Result<bool, Exhaustion> {
        let mut splits: Vec<Split> = Vec::new();
        loop {
            let level = splits.len();
            self.budget.spend()?;

            if self.propagate() {
                if self.options.pure_literals {
                    self.assign_pure_literals(level);
                }
                let Some(lit) = self.pick_branch() else {
                    return Ok(true);
                };
                splits.push(Split {
                    lit,
                    mark: self.trail.len(),
                    negated: false,
                });
                self.decide(lit, level + 1);
                continue;
            }

            // the node failed; reopen the nearest split with a case left
            loop {
                let Some(level) = splits.len().checked_sub(1) else {
                    return Ok(false);
                };
                let split = splits[level];
                self.undo(split.mark);
                self.record(TraceEvent::Backtrack { level });
                if !split.negated {
                    splits[level].negated = true;
                    self.decide(split.lit.negate(), level + 1);
                    break;
                }
                splits.pop();
                self.record(TraceEvent::Exhausted { var: split.lit.var().0, level });
            }
        }
    }
}

/// An open case split: the first literal tried and the trail length before it
#[derive(Debug, Clone, Copy)]
struct Split {
    lit: Lit,
    mark: usize,
    negated: bool,
}
