//! Refutation proofs
//!
//! A proof replays a traced DPLL search over the clauses of one core. The
//! core's clauses are listed as premises; each forced literal cites its
//! clause and the lines refuting the clause's other literals; each case
//! split opens a nested hypothesis; a conflict closes its case with the
//! complementary pair and `⊥`; a split whose two cases both reach `⊥`
//! closes the enclosing case. The last line is `⊥` at depth 0.
//!
//! [`Proof::verify`] re-checks every line against the premises without
//! running the solver.

use std::collections::{BTreeSet, HashMap, HashSet};

use dialectic_types::{ArgumentSet, FormalProof, Justification, ProofLine};
use thiserror::Error;
use tracing::debug;

use crate::budget::{Budget, Exhaustion};
use crate::cnf::{Clause, Lit, VarTable};
use crate::encoder::Encoding;
use crate::solver::{solve_traced, SolveOutcome, TraceEvent};

/// Errors from building or checking a proof
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("Proof replay stopped: {0}")]
    Exhausted(Exhaustion),

    #[error("Core is satisfiable")]
    Satisfiable,

    #[error("Trace cannot be replayed: {0}")]
    Replay(String),

    #[error("Line {line} is not justified: {reason}")]
    InvalidLine { line: usize, reason: String },
}

/// What a proof line asserts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Clause(Clause),
    Literal(Lit),
    Bottom,
}

/// One line of a proof
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStep {
    pub depth: usize,
    pub statement: Statement,
    pub justification: Justification,
}

/// A checked derivation of `⊥` from the clauses of a core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    steps: Vec<ProofStep>,
}

impl Proof {
    /// Build the proof that the propositions in `core` are jointly
    /// unsatisfiable
    pub fn construct(
        encoding: &Encoding,
        set: &ArgumentSet,
        core: &BTreeSet<usize>,
        budget: &Budget,
    ) -> Result<Self, ProofError> {
        let (clauses, map) = encoding.restrict(core);
        let (outcome, trace) = solve_traced(encoding.num_vars(), &clauses, budget);
        match outcome {
            SolveOutcome::Unsat(_) => {}
            SolveOutcome::Sat(_) => return Err(ProofError::Satisfiable),
            SolveOutcome::Unknown(exhaustion) => return Err(ProofError::Exhausted(exhaustion)),
        }

        let mut builder = Builder::new(&clauses);
        for (local, &global) in map.iter().enumerate() {
            let tagged = &encoding.clauses[global];
            let proposition_ids = tagged
                .tags
                .iter()
                .filter_map(|&t| set.propositions().get(t).map(|p| p.id.clone()))
                .collect();
            builder.premise(
                &clauses[local],
                Justification::Premise {
                    proposition_ids,
                    source: tagged.source.clone(),
                },
            );
        }
        for event in &trace {
            builder.replay(event)?;
        }
        let proof = builder.finish()?;
        debug!(lines = proof.steps.len(), events = trace.len(), "constructed refutation proof");
        Ok(proof)
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Render the proof with variable names
    pub fn render(&self, vars: &VarTable) -> FormalProof {
        let lines = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| ProofLine {
                number: i + 1,
                depth: step.depth,
                formula: match &step.statement {
                    Statement::Clause(clause) => clause.display(vars).to_string(),
                    Statement::Literal(lit) => vars.lit_name(*lit),
                    Statement::Bottom => "⊥".to_string(),
                },
                justification: step.justification.clone(),
            })
            .collect();
        FormalProof::from_lines(lines)
    }

    /// Check every line; the proof must end in `⊥` at depth 0
    pub fn verify(&self) -> Result<(), ProofError> {
        Checker::default().run(&self.steps)
    }
}

#[derive(Debug, Default)]
struct Frame {
    assumption: Option<usize>,
    literals: HashMap<Lit, usize>,
    bottom: Option<usize>,
    cases: Vec<[usize; 2]>,
}

/// Turns trace events into proof lines
struct Builder<'a> {
    clauses: &'a [Clause],
    steps: Vec<ProofStep>,
    frames: Vec<Frame>,
}

impl<'a> Builder<'a> {
    fn new(clauses: &'a [Clause]) -> Self {
        Self {
            clauses,
            steps: Vec::new(),
            frames: vec![Frame::default()],
        }
    }

    /// Append a line at the current depth and return its number
    fn push(&mut self, statement: Statement, justification: Justification) -> usize {
        self.steps.push(ProofStep {
            depth: self.frames.len() - 1,
            statement,
            justification,
        });
        self.steps.len()
    }

    fn premise(&mut self, clause: &Clause, justification: Justification) {
        self.push(Statement::Clause(clause.clone()), justification);
    }

    fn frame(&mut self) -> Result<&mut Frame, ProofError> {
        self.frames
            .last_mut()
            .ok_or_else(|| ProofError::Replay("no open case".to_string()))
    }

    fn line_of(&self, lit: Lit) -> Result<usize, ProofError> {
        self.frames
            .iter()
            .rev()
            .find_map(|f| f.literals.get(&lit).copied())
            .ok_or_else(|| ProofError::Replay(format!("literal {} was never derived", lit.code())))
    }

    fn clause(&self, index: usize) -> Result<&'a Clause, ProofError> {
        self.clauses
            .get(index)
            .ok_or_else(|| ProofError::Replay(format!("clause {} out of range", index)))
    }

    /// Lines refuting every literal of `clause` except `keep`
    fn antecedents(&self, clause: &Clause, keep: Lit) -> Result<Vec<usize>, ProofError> {
        clause
            .lits()
            .iter()
            .filter(|&&lit| lit != keep)
            .map(|&lit| self.line_of(lit.negate()))
            .collect()
    }

    fn derive(&mut self, lit: Lit, justification: Justification) -> Result<usize, ProofError> {
        let line = self.push(Statement::Literal(lit), justification);
        self.frame()?.literals.insert(lit, line);
        Ok(line)
    }

    fn replay(&mut self, event: &TraceEvent) -> Result<(), ProofError> {
        match *event {
            TraceEvent::Decision { lit, .. } => {
                let lit = Lit::from_code(lit);
                self.frames.push(Frame::default());
                let line = self.derive(lit, Justification::Assumption)?;
                self.frame()?.assumption = Some(line);
            }
            TraceEvent::Propagation { lit, clause } => {
                let lit = Lit::from_code(lit);
                let source = self.clause(clause)?;
                let antecedents = self.antecedents(source, lit)?;
                self.derive(
                    lit,
                    Justification::UnitResolution {
                        clause: clause + 1,
                        antecedents,
                    },
                )?;
            }
            TraceEvent::PureLiteral { lit, .. } => {
                self.derive(Lit::from_code(lit), Justification::PureLiteral)?;
            }
            TraceEvent::Conflict { clause } => {
                let source = self.clause(clause)?;
                let bottom = match source.lits().first() {
                    None => self.push(Statement::Bottom, Justification::EmptyClause { clause: clause + 1 }),
                    Some(&first) => {
                        let antecedents = self.antecedents(source, first)?;
                        let negative = self.line_of(first.negate())?;
                        let positive = self.push(
                            Statement::Literal(first),
                            Justification::UnitResolution {
                                clause: clause + 1,
                                antecedents,
                            },
                        );
                        self.push(Statement::Bottom, Justification::Contradiction { positive, negative })
                    }
                };
                self.frame()?.bottom = Some(bottom);
            }
            TraceEvent::Backtrack { .. } => {
                let closed = self
                    .frames
                    .pop()
                    .filter(|_| !self.frames.is_empty())
                    .ok_or_else(|| ProofError::Replay("backtrack without an open case".to_string()))?;
                let (Some(assumption), Some(bottom)) = (closed.assumption, closed.bottom) else {
                    return Err(ProofError::Replay("case closed without reaching ⊥".to_string()));
                };
                self.frame()?.cases.push([assumption, bottom]);
            }
            TraceEvent::Exhausted { .. } => {
                let cases = std::mem::take(&mut self.frame()?.cases);
                let line = self.push(Statement::Bottom, Justification::CaseAnalysis { cases });
                self.frame()?.bottom = Some(line);
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Proof, ProofError> {
        if self.frames.len() != 1 || self.frames[0].bottom.is_none() {
            return Err(ProofError::Replay("search did not close every case".to_string()));
        }
        Ok(Proof { steps: self.steps })
    }
}

/// Line-by-line proof checker
#[derive(Default)]
struct Checker {
    /// Open scopes, outermost first; each holds the lines written in it
    scopes: Vec<Vec<usize>>,
    /// Closed cases as (assumption line, last line, depth)
    closed: Vec<(usize, usize, usize)>,
    pure: HashSet<usize>,
}

impl Checker {
    fn run(mut self, steps: &[ProofStep]) -> Result<(), ProofError> {
        self.scopes.push(Vec::new());
        for (index, step) in steps.iter().enumerate() {
            let line = index + 1;
            self.check_line(steps, line, step)
                .map_err(|reason| ProofError::InvalidLine { line, reason })?;
        }
        match steps.last() {
            Some(last) if last.depth == 0 && last.statement == Statement::Bottom => Ok(()),
            _ => Err(ProofError::InvalidLine {
                line: steps.len(),
                reason: "proof does not end in ⊥ at depth 0".to_string(),
            }),
        }
    }

    fn close_to(&mut self, open: usize) {
        while self.scopes.len() > open {
            if let Some(scope) = self.scopes.pop() {
                if let (Some(&first), Some(&last)) = (scope.first(), scope.last()) {
                    self.closed.push((first, last, self.scopes.len()));
                }
            }
        }
    }

    fn visible(&self, target: usize, line: usize) -> bool {
        target < line && self.scopes.iter().any(|scope| scope.contains(&target))
    }

    fn literal_at(&self, steps: &[ProofStep], target: usize, line: usize) -> Result<Lit, String> {
        if !self.visible(target, line) {
            return Err(format!("line {} is not in scope", target));
        }
        if self.pure.contains(&target) {
            return Err(format!("line {} is a pure-literal choice and cannot be cited", target));
        }
        match steps.get(target - 1).map(|s| &s.statement) {
            Some(Statement::Literal(lit)) => Ok(*lit),
            _ => Err(format!("line {} is not a literal", target)),
        }
    }

    fn clause_at<'s>(&self, steps: &'s [ProofStep], target: usize, line: usize) -> Result<&'s Clause, String> {
        if !self.visible(target, line) {
            return Err(format!("line {} is not in scope", target));
        }
        match steps.get(target - 1) {
            Some(ProofStep {
                statement: Statement::Clause(clause),
                justification: Justification::Premise { .. },
                ..
            }) => Ok(clause),
            _ => Err(format!("line {} is not a premise clause", target)),
        }
    }

    fn check_line(&mut self, steps: &[ProofStep], line: usize, step: &ProofStep) -> Result<(), String> {
        if let Justification::Assumption = step.justification {
            if step.depth == 0 || step.depth > self.scopes.len() {
                return Err("assumption at an impossible depth".to_string());
            }
            if !matches!(step.statement, Statement::Literal(_)) {
                return Err("assumptions must be literals".to_string());
            }
            self.close_to(step.depth);
            self.scopes.push(vec![line]);
            return Ok(());
        }

        if step.depth + 1 > self.scopes.len() {
            return Err("depth increases without an assumption".to_string());
        }
        self.close_to(step.depth + 1);

        match &step.justification {
            Justification::Assumption => {}
            Justification::Premise { .. } => {
                if step.depth != 0 || !matches!(step.statement, Statement::Clause(_)) {
                    return Err("premises are clauses at depth 0".to_string());
                }
            }
            Justification::PureLiteral => {
                if !matches!(step.statement, Statement::Literal(_)) {
                    return Err("pure literal line must be a literal".to_string());
                }
                self.pure.insert(line);
            }
            Justification::UnitResolution { clause, antecedents } => {
                let Statement::Literal(derived) = step.statement else {
                    return Err("unit resolution derives a literal".to_string());
                };
                let source = self.clause_at(steps, *clause, line)?;
                let mut expected: BTreeSet<Lit> = BTreeSet::new();
                expected.insert(derived);
                for &antecedent in antecedents {
                    expected.insert(self.literal_at(steps, antecedent, line)?.negate());
                }
                let actual: BTreeSet<Lit> = source.lits().iter().copied().collect();
                if actual != expected || expected.len() != antecedents.len() + 1 {
                    return Err(format!("clause {} does not force this literal", clause));
                }
            }
            Justification::Contradiction { positive, negative } => {
                if step.statement != Statement::Bottom {
                    return Err("contradiction derives ⊥".to_string());
                }
                let p = self.literal_at(steps, *positive, line)?;
                let n = self.literal_at(steps, *negative, line)?;
                if p.negate() != n {
                    return Err(format!("lines {} and {} are not complementary", positive, negative));
                }
            }
            Justification::EmptyClause { clause } => {
                if step.statement != Statement::Bottom {
                    return Err("empty clause derives ⊥".to_string());
                }
                if !self.clause_at(steps, *clause, line)?.is_empty() {
                    return Err(format!("clause {} is not empty", clause));
                }
            }
            Justification::CaseAnalysis { cases } => {
                if step.statement != Statement::Bottom {
                    return Err("case analysis derives ⊥".to_string());
                }
                let opened = self.scopes.last().and_then(|s| s.first()).copied().unwrap_or(0);
                let mut hypotheses = Vec::new();
                for &[assumption, end] in cases {
                    let closed = self
                        .closed
                        .contains(&(assumption, end, step.depth + 1));
                    if !closed || assumption <= opened {
                        return Err(format!("lines {}-{} are not a closed case here", assumption, end));
                    }
                    if steps.get(end - 1).map(|s| &s.statement) != Some(&Statement::Bottom) {
                        return Err(format!("case {}-{} does not end in ⊥", assumption, end));
                    }
                    match steps.get(assumption - 1).map(|s| &s.statement) {
                        Some(Statement::Literal(lit)) => hypotheses.push(*lit),
                        _ => return Err(format!("line {} is not a hypothesis", assumption)),
                    }
                }
                let exhaustive = hypotheses.len() == 2 && hypotheses[0] == hypotheses[1].negate();
                if !exhaustive {
                    return Err("cases do not cover both polarities".to_string());
                }
            }
        }

        if let Some(scope) = self.scopes.last_mut() {
            scope.push(line);
        }
        Ok(())
    }
}
