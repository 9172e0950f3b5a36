// Dialectic Logic
//
// Propositional side of the engine: formal-expression parsing, clause
// normal form, the encoding of an argument set, a bounded DPLL solver,
// minimal unsatisfiable cores and checkable refutation proofs.

pub mod budget;
pub mod cnf;
pub mod core;
pub mod encoder;
pub mod expr;
pub mod lexer;
pub mod parser;
pub mod proof;
pub mod solver;

pub use budget::{Budget, CancellationToken, Exhaustion};
pub use cnf::{Clause, Lit, Var, VarName, VarTable, MAX_EXPRESSION_CLAUSES};
pub use core::{find_contradictions, minimal_core, ContradictionSearch};
pub use encoder::{encode, AttackPolicy, ClauseOrigin, Encoding, EncodingOptions, TaggedClause};
pub use expr::Expr;
pub use parser::{parse, MAX_NESTING};
pub use proof::{Proof, ProofError, ProofStep, Statement};
pub use solver::{solve, solve_traced, Model, Refutation, SolveOutcome, TraceEvent};
