// Propositional expression tree

use std::fmt;

/// A parsed formal expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Atomic predicate, keyed by its normalised text
    Atom(String),
    Const(bool),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    Iff(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn atom(name: impl Into<String>) -> Self {
        Expr::Atom(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(e: Expr) -> Self {
        Expr::Not(Box::new(e))
    }

    pub fn and(a: Expr, b: Expr) -> Self {
        Expr::And(Box::new(a), Box::new(b))
    }

    pub fn or(a: Expr, b: Expr) -> Self {
        Expr::Or(Box::new(a), Box::new(b))
    }

    pub fn implies(a: Expr, b: Expr) -> Self {
        Expr::Implies(Box::new(a), Box::new(b))
    }

    pub fn iff(a: Expr, b: Expr) -> Self {
        Expr::Iff(Box::new(a), Box::new(b))
    }

    /// The consequent of an implication chain, or the expression itself.
    ///
    /// `A → (B → C)` concludes `C`; anything that is not an implication
    /// concludes itself.
    pub fn conclusion(&self) -> &Expr {
        let mut current = self;
        while let Expr::Implies(_, consequent) = current {
            current = &**consequent;
        }
        current
    }

    /// Operands of a top-level disjunction, flattened across nested `∨`.
    ///
    /// Returns an empty list when the top-level connective is not `∨`.
    pub fn disjuncts(&self) -> Vec<&Expr> {
        fn collect<'a>(e: &'a Expr, out: &mut Vec<&'a Expr>) {
            match e {
                Expr::Or(a, b) => {
                    collect(a, out);
                    collect(b, out);
                }
                other => out.push(other),
            }
        }
        let mut out = Vec::new();
        if let Expr::Or(..) = self {
            collect(self, &mut out);
        }
        out
    }

    /// Atom names in order of first occurrence
    pub fn atoms(&self) -> Vec<&str> {
        fn collect<'a>(e: &'a Expr, out: &mut Vec<&'a str>) {
            match e {
                Expr::Atom(name) => {
                    if !out.contains(&name.as_str()) {
                        out.push(name);
                    }
                }
                Expr::Const(_) => {}
                Expr::Not(inner) => collect(inner, out),
                Expr::And(a, b) | Expr::Or(a, b) | Expr::Implies(a, b) | Expr::Iff(a, b) => {
                    collect(a, out);
                    collect(b, out);
                }
            }
        }
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    /// Binding strength, higher binds tighter
    fn precedence(&self) -> u8 {
        match self {
            Expr::Atom(_) | Expr::Const(_) => 6,
            Expr::Not(_) => 5,
            Expr::And(..) => 4,
            Expr::Or(..) => 3,
            Expr::Implies(..) => 2,
            Expr::Iff(..) => 1,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn wrap(f: &mut fmt::Formatter<'_>, e: &Expr, min: u8) -> fmt::Result {
            if e.precedence() < min {
                write!(f, "({})", e)
            } else {
                write!(f, "{}", e)
            }
        }
        match self {
            Expr::Atom(name) => f.write_str(name),
            Expr::Const(true) => f.write_str("⊤"),
            Expr::Const(false) => f.write_str("⊥"),
            Expr::Not(inner) => {
                f.write_str("¬")?;
                wrap(f, inner, 5)
            }
            Expr::And(a, b) => {
                wrap(f, a, 4)?;
                f.write_str(" ∧ ")?;
                wrap(f, b, 5)
            }
            Expr::Or(a, b) => {
                wrap(f, a, 3)?;
                f.write_str(" ∨ ")?;
                wrap(f, b, 4)
            }
            // right associative
            Expr::Implies(a, b) => {
                wrap(f, a, 3)?;
                f.write_str(" → ")?;
                wrap(f, b, 2)
            }
            // left associative
            Expr::Iff(a, b) => {
                wrap(f, a, 1)?;
                f.write_str(" ↔ ")?;
                wrap(f, b, 2)
            }
        }
    }
}
