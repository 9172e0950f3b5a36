// CNF lowering
// Implication/equivalence elimination, negation normal form and
// distribution. No auxiliary variables are introduced.

use std::collections::HashMap;
use std::fmt;

use dialectic_error::{FormulaError, FormulaResult};
use dialectic_types::PropositionId;

use crate::expr::Expr;

/// Upper bound on the clauses one expression may distribute into
pub const MAX_EXPRESSION_CLAUSES: usize = 4096;

/// A propositional variable, numbered in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(pub u32);

impl Var {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A variable or its negation.
///
/// Encoded as `var << 1 | negated`, so literals of the same variable sort
/// next to each other with the positive one first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(u32);

impl Lit {
    pub fn new(var: Var, positive: bool) -> Self {
        Lit(var.0 << 1 | u32::from(!positive))
    }

    pub fn positive(var: Var) -> Self {
        Self::new(var, true)
    }

    pub fn negative(var: Var) -> Self {
        Self::new(var, false)
    }

    pub fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    pub fn is_positive(self) -> bool {
        self.0 & 1 == 0
    }

    pub fn negate(self) -> Self {
        Lit(self.0 ^ 1)
    }

    /// Raw encoding, stable across runs
    pub fn code(self) -> u32 {
        self.0
    }

    pub fn from_code(code: u32) -> Self {
        Lit(code)
    }
}

/// A disjunction of literals; sorted and duplicate free
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    pub fn new(mut lits: Vec<Lit>) -> Self {
        lits.sort_unstable();
        lits.dedup();
        Self { lits }
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn contains(&self, lit: Lit) -> bool {
        self.lits.binary_search(&lit).is_ok()
    }

    /// Contains a literal and its negation
    pub fn is_tautology(&self) -> bool {
        self.lits.windows(2).any(|w| w[0].var() == w[1].var())
    }

    pub fn display<'a>(&'a self, vars: &'a VarTable) -> ClauseDisplay<'a> {
        ClauseDisplay { clause: self, vars }
    }
}

/// Symbolic rendering of a clause
pub struct ClauseDisplay<'a> {
    clause: &'a Clause,
    vars: &'a VarTable,
}

impl fmt::Display for ClauseDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clause.is_empty() {
            return f.write_str("⊥");
        }
        for (i, lit) in self.clause.lits().iter().enumerate() {
            if i > 0 {
                f.write_str(" ∨ ")?;
            }
            write!(f, "{}", self.vars.lit_name(*lit))?;
        }
        Ok(())
    }
}

/// What a variable stands for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VarName {
    /// An atomic predicate, by normalised text
    Atom(String),
    /// The synthetic variable asserting a whole proposition
    Proposition(PropositionId),
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarName::Atom(text) => f.write_str(text),
            VarName::Proposition(id) => write!(f, "[{}]", id),
        }
    }
}

/// Variables of one formula, minted on first use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarTable {
    names: Vec<VarName>,
    lookup: HashMap<VarName, Var>,
}

impl VarTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variable for a name, minting it when unseen
    pub fn intern(&mut self, name: VarName) -> Var {
        if let Some(&var) = self.lookup.get(&name) {
            return var;
        }
        let var = Var(self.names.len() as u32);
        self.names.push(name.clone());
        self.lookup.insert(name, var);
        var
    }

    pub fn atom(&mut self, text: &str) -> Var {
        self.intern(VarName::Atom(text.to_string()))
    }

    pub fn proposition(&mut self, id: &PropositionId) -> Var {
        self.intern(VarName::Proposition(id.clone()))
    }

    pub fn get(&self, name: &VarName) -> Option<Var> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, var: Var) -> Option<&VarName> {
        self.names.get(var.index())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn lit_name(&self, lit: Lit) -> String {
        let name = self
            .name(lit.var())
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("v{}", lit.var().0));
        if lit.is_positive() {
            name
        } else {
            format!("¬{}", name)
        }
    }
}

/// Negation normal form with constants folded away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nnf {
    Lit(Lit),
    Const(bool),
    And(Vec<Nnf>),
    Or(Vec<Nnf>),
}

impl Nnf {
    fn and(parts: Vec<Nnf>) -> Nnf {
        let mut out = Vec::new();
        for part in parts {
            match part {
                Nnf::Const(true) => {}
                Nnf::Const(false) => return Nnf::Const(false),
                Nnf::And(inner) => out.extend(inner),
                other => out.push(other),
            }
        }
        match out.len() {
            0 => Nnf::Const(true),
            1 => out.remove(0),
            _ => Nnf::And(out),
        }
    }

    fn or(parts: Vec<Nnf>) -> Nnf {
        let mut out = Vec::new();
        for part in parts {
            match part {
                Nnf::Const(false) => {}
                Nnf::Const(true) => return Nnf::Const(true),
                Nnf::Or(inner) => out.extend(inner),
                other => out.push(other),
            }
        }
        match out.len() {
            0 => Nnf::Const(false),
            1 => out.remove(0),
            _ => Nnf::Or(out),
        }
    }
}

/// Push negations to the atoms, eliminating `→` and `↔`
pub fn to_nnf(expr: &Expr, positive: bool, vars: &mut VarTable) -> Nnf {
    match expr {
        Expr::Atom(text) => Nnf::Lit(Lit::new(vars.atom(text), positive)),
        Expr::Const(value) => Nnf::Const(*value == positive),
        Expr::Not(inner) => to_nnf(inner, !positive, vars),
        Expr::And(a, b) if positive => Nnf::and(vec![to_nnf(a, true, vars), to_nnf(b, true, vars)]),
        Expr::And(a, b) => Nnf::or(vec![to_nnf(a, false, vars), to_nnf(b, false, vars)]),
        Expr::Or(a, b) if positive => Nnf::or(vec![to_nnf(a, true, vars), to_nnf(b, true, vars)]),
        Expr::Or(a, b) => Nnf::and(vec![to_nnf(a, false, vars), to_nnf(b, false, vars)]),
        // a → b  ==  ¬a ∨ b
        Expr::Implies(a, b) if positive => {
            Nnf::or(vec![to_nnf(a, false, vars), to_nnf(b, true, vars)])
        }
        Expr::Implies(a, b) => Nnf::and(vec![to_nnf(a, true, vars), to_nnf(b, false, vars)]),
        // a ↔ b  ==  (¬a ∨ b) ∧ (a ∨ ¬b)
        Expr::Iff(a, b) if positive => Nnf::and(vec![
            Nnf::or(vec![to_nnf(a, false, vars), to_nnf(b, true, vars)]),
            Nnf::or(vec![to_nnf(a, true, vars), to_nnf(b, false, vars)]),
        ]),
        // ¬(a ↔ b)  ==  (a ∨ b) ∧ (¬a ∨ ¬b)
        Expr::Iff(a, b) => Nnf::and(vec![
            Nnf::or(vec![to_nnf(a, true, vars), to_nnf(b, true, vars)]),
            Nnf::or(vec![to_nnf(a, false, vars), to_nnf(b, false, vars)]),
        ]),
    }
}

/// Distribute an NNF into clauses.
///
/// Tautologies are dropped and duplicate clauses keep their first position.
pub fn distribute(nnf: &Nnf) -> FormulaResult<Vec<Clause>> {
    let raw = clauses_of(nnf)?;
    let mut out: Vec<Clause> = Vec::with_capacity(raw.len());
    for lits in raw {
        let clause = Clause::new(lits);
        if !clause.is_tautology() && !out.contains(&clause) {
            out.push(clause);
        }
    }
    Ok(out)
}

fn clauses_of(nnf: &Nnf) -> FormulaResult<Vec<Vec<Lit>>> {
    let too_large = || FormulaError::TooLarge { limit: MAX_EXPRESSION_CLAUSES };
    match nnf {
        Nnf::Lit(lit) => Ok(vec![vec![*lit]]),
        Nnf::Const(true) => Ok(Vec::new()),
        Nnf::Const(false) => Ok(vec![Vec::new()]),
        Nnf::And(parts) => {
            let mut out = Vec::new();
            for part in parts {
                out.extend(clauses_of(part)?);
                if out.len() > MAX_EXPRESSION_CLAUSES {
                    return Err(too_large());
                }
            }
            Ok(out)
        }
        Nnf::Or(parts) => {
            let mut acc: Vec<Vec<Lit>> = vec![Vec::new()];
            for part in parts {
                let rhs = clauses_of(part)?;
                if acc.len().saturating_mul(rhs.len()) > MAX_EXPRESSION_CLAUSES {
                    return Err(too_large());
                }
                let mut next = Vec::with_capacity(acc.len() * rhs.len());
                for left in &acc {
                    for right in &rhs {
                        let mut merged = left.clone();
                        merged.extend_from_slice(right);
                        next.push(merged);
                    }
                }
                acc = next;
            }
            Ok(acc)
        }
    }
}

/// Lower an expression to CNF, minting atom variables in `vars`
pub fn to_cnf(expr: &Expr, vars: &mut VarTable) -> FormulaResult<Vec<Clause>> {
    distribute(&to_nnf(expr, true, vars))
}

/// Clauses of `var ↔ expr`
pub fn definition(var: Var, expr: &Expr, vars: &mut VarTable) -> FormulaResult<Vec<Clause>> {
    let nnf = Nnf::and(vec![
        Nnf::or(vec![Nnf::Lit(Lit::negative(var)), to_nnf(expr, true, vars)]),
        Nnf::or(vec![Nnf::Lit(Lit::positive(var)), to_nnf(expr, false, vars)]),
    ]);
    distribute(&nnf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn render(clauses: &[Clause], vars: &VarTable) -> Vec<String> {
        clauses.iter().map(|c| c.display(vars).to_string()).collect()
    }

    #[test]
    fn test_literal_encoding() {
        let v = Var(3);
        assert_eq!(Lit::positive(v).var(), v);
        assert!(!Lit::negative(v).is_positive());
        assert_eq!(Lit::positive(v).negate(), Lit::negative(v));
        assert!(Lit::positive(v) < Lit::negative(v));
    }

    #[test]
    fn test_implication_lowers_to_one_clause() {
        let mut vars = VarTable::new();
        let clauses = to_cnf(&parse("cow_product(cow_milk) → hates(user, cow_milk)").unwrap(), &mut vars)
            .unwrap();
        assert_eq!(render(&clauses, &vars), vec!["¬cow_product(cow_milk) ∨ hates(user, cow_milk)"]);
    }

    #[test]
    fn test_distribution_and_de_morgan() {
        let mut vars = VarTable::new();
        let clauses = to_cnf(&parse("¬(A ∧ B) ∨ (C ∧ D)").unwrap(), &mut vars).unwrap();
        assert_eq!(render(&clauses, &vars), vec!["¬A ∨ ¬B ∨ C", "¬A ∨ ¬B ∨ D"]);
    }

    #[test]
    fn test_iff_and_constants() {
        let mut vars = VarTable::new();
        let clauses = to_cnf(&parse("A ↔ B").unwrap(), &mut vars).unwrap();
        assert_eq!(render(&clauses, &vars), vec!["¬A ∨ B", "A ∨ ¬B"]);
        assert!(to_cnf(&parse("A ∨ ⊤").unwrap(), &mut vars).unwrap().is_empty());
        assert_eq!(to_cnf(&parse("A ∧ ⊥").unwrap(), &mut vars).unwrap(), vec![Clause::default()]);
    }

    #[test]
    fn test_tautologies_dropped() {
        let mut vars = VarTable::new();
        assert!(to_cnf(&parse("A ∨ ¬A").unwrap(), &mut vars).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_distribution_is_rejected() {
        let text = (0..13)
            .map(|i| format!("(a{} ∧ b{})", i, i))
            .collect::<Vec<_>>()
            .join(" ∨ ");
        let mut vars = VarTable::new();
        assert_eq!(
            to_cnf(&parse(&text).unwrap(), &mut vars),
            Err(FormulaError::TooLarge { limit: MAX_EXPRESSION_CLAUSES })
        );
    }

    #[test]
    fn test_definition_clauses() {
        let mut vars = VarTable::new();
        let s = vars.proposition(&"p1".into());
        let clauses = definition(s, &parse("hates(user, milk)").unwrap(), &mut vars).unwrap();
        assert_eq!(render(&clauses, &vars), vec!["¬[p1] ∨ hates(user, milk)", "[p1] ∨ ¬hates(user, milk)"]);
    }
}
