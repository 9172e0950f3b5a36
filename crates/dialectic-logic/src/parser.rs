//! Parser for formal expressions
//!
//! Recursive descent over the token stream produced by [`Lexer`]. Precedence
//! from tightest: `¬`, `∧`, `∨`, `→` (right associative), `↔` (left
//! associative). Predicate atoms keep their argument lists as text, with
//! whitespace normalised so that `p(a,b)` and `p( a , b )` name the same
//! variable. Comparisons such as `time(rebuild) > 12_months` fold into a
//! single atom.

use dialectic_error::{FormulaError, FormulaResult};

use crate::expr::Expr;
use crate::lexer::{Lexer, PositionedToken, Token};

/// Deepest expression tree, or parenthesis nesting, the parser accepts
pub const MAX_NESTING: usize = 128;

const DEEP_FRAGMENT_CHARS: usize = 32;

/// An expression with the height of its tree
type Node = (Expr, usize);

/// Parse a formal expression
pub fn parse(input: &str) -> FormulaResult<Expr> {
    ExprParser::new(input)?.parse()
}

/// Parser state over one expression
pub struct ExprParser {
    lexer: Lexer,
    tokens: Vec<PositionedToken>,
    position: usize,
    /// Offsets of currently open parentheses
    open_parens: Vec<usize>,
}

impl ExprParser {
    pub fn new(input: &str) -> FormulaResult<Self> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            lexer,
            tokens,
            position: 0,
            open_parens: Vec::new(),
        })
    }

    pub fn parse(&mut self) -> FormulaResult<Expr> {
        if matches!(self.current().token, Token::Eof) {
            return Err(FormulaError::EmptyExpression);
        }
        let (expr, _) = self.parse_iff()?;
        let current = self.current().clone();
        match current.token {
            Token::Eof => Ok(expr),
            Token::RightParen => Err(FormulaError::UnexpectedCloseParen { offset: current.start }),
            _ => Err(FormulaError::TrailingInput {
                offset: current.start,
                fragment: self.lexer.fragment_from(current.start),
            }),
        }
    }

    fn current(&self) -> &PositionedToken {
        // tokenize always ends with Eof
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if &self.current().token == token {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `token`, returning the offset it started at
    fn eat_at(&mut self, token: &Token) -> Option<usize> {
        let start = self.current().start;
        self.eat(token).then_some(start)
    }

    fn unexpected(&self) -> FormulaError {
        let current = self.current();
        match current.token {
            Token::Eof => match self.open_parens.last() {
                Some(&offset) => FormulaError::UnclosedParen {
                    offset,
                    fragment: self.lexer.fragment_from(offset),
                },
                None => FormulaError::UnexpectedEnd { offset: current.start },
            },
            Token::RightParen if self.open_parens.is_empty() => {
                FormulaError::UnexpectedCloseParen { offset: current.start }
            }
            _ => FormulaError::UnexpectedToken {
                found: current.format_for_error(),
                offset: current.start,
                fragment: self.lexer.fragment_from(current.start),
            },
        }
    }

    fn too_deep(&self, offset: usize) -> FormulaError {
        FormulaError::TooDeep {
            limit: MAX_NESTING,
            offset,
            fragment: self.lexer.fragment_from(offset).chars().take(DEEP_FRAGMENT_CHARS).collect(),
        }
    }

    /// Height of a node joined at `offset`, rejected past [`MAX_NESTING`]
    fn joined(&self, height: usize, offset: usize) -> FormulaResult<usize> {
        if height > MAX_NESTING {
            return Err(self.too_deep(offset));
        }
        Ok(height)
    }

    fn open_paren(&mut self, offset: usize) -> FormulaResult<()> {
        self.open_parens.push(offset);
        if self.open_parens.len() > MAX_NESTING {
            return Err(self.too_deep(offset));
        }
        Ok(())
    }

    fn parse_iff(&mut self) -> FormulaResult<Node> {
        let (mut left, mut height) = self.parse_implies()?;
        while let Some(at) = self.eat_at(&Token::Iff) {
            let (right, right_height) = self.parse_implies()?;
            height = self.joined(height.max(right_height) + 1, at)?;
            left = Expr::iff(left, right);
        }
        Ok((left, height))
    }

    fn parse_implies(&mut self) -> FormulaResult<Node> {
        let first = self.parse_or()?;
        let mut rest = Vec::new();
        while let Some(at) = self.eat_at(&Token::Implies) {
            rest.push((at, self.parse_or()?));
        }

        // right associative, folded from the last operand
        let Some((mut arrow, (mut consequent, mut height))) = rest.pop() else {
            return Ok(first);
        };
        while let Some((at, (antecedent, antecedent_height))) = rest.pop() {
            height = self.joined(height.max(antecedent_height) + 1, arrow)?;
            consequent = Expr::implies(antecedent, consequent);
            arrow = at;
        }
        let (antecedent, antecedent_height) = first;
        height = self.joined(height.max(antecedent_height) + 1, arrow)?;
        Ok((Expr::implies(antecedent, consequent), height))
    }

    fn parse_or(&mut self) -> FormulaResult<Node> {
        let (mut left, mut height) = self.parse_and()?;
        while let Some(at) = self.eat_at(&Token::Or) {
            let (right, right_height) = self.parse_and()?;
            height = self.joined(height.max(right_height) + 1, at)?;
            left = Expr::or(left, right);
        }
        Ok((left, height))
    }

    fn parse_and(&mut self) -> FormulaResult<Node> {
        let (mut left, mut height) = self.parse_unary()?;
        while let Some(at) = self.eat_at(&Token::And) {
            let (right, right_height) = self.parse_unary()?;
            height = self.joined(height.max(right_height) + 1, at)?;
            left = Expr::and(left, right);
        }
        Ok((left, height))
    }

    fn parse_unary(&mut self) -> FormulaResult<Node> {
        let mut negations = Vec::new();
        while let Some(at) = self.eat_at(&Token::Not) {
            negations.push(at);
            if negations.len() > MAX_NESTING {
                return Err(self.too_deep(at));
            }
        }
        let (mut expr, mut height) = self.parse_primary()?;
        while let Some(at) = negations.pop() {
            height = self.joined(height + 1, at)?;
            expr = Expr::not(expr);
        }
        Ok((expr, height))
    }

    fn parse_primary(&mut self) -> FormulaResult<Node> {
        let current = self.current().clone();
        match current.token {
            Token::LeftParen => {
                self.open_paren(current.start)?;
                self.advance();
                let inner = self.parse_iff()?;
                if !self.eat(&Token::RightParen) {
                    return Err(self.unexpected());
                }
                self.open_parens.pop();
                Ok(inner)
            }
            Token::Const(value) => {
                self.advance();
                Ok((Expr::Const(value), 1))
            }
            Token::Ident(_) => Ok((self.parse_atom()?, 1)),
            _ => Err(self.unexpected()),
        }
    }

    /// `term [op term]`
    fn parse_atom(&mut self) -> FormulaResult<Expr> {
        let lhs = self.parse_term()?;
        if let Token::Compare(op) = self.current().token.clone() {
            self.advance();
            let rhs = match self.current().token.clone() {
                Token::Ident(_) => self.parse_term()?,
                Token::Const(value) => {
                    self.advance();
                    value.to_string()
                }
                _ => return Err(self.unexpected()),
            };
            return Ok(Expr::Atom(format!("{} {} {}", lhs, op, rhs)));
        }
        Ok(Expr::Atom(lhs))
    }

    /// `name [ '(' args ')' ]`, rendered as normalised text
    fn parse_term(&mut self) -> FormulaResult<String> {
        let Token::Ident(name) = self.current().token.clone() else {
            return Err(self.unexpected());
        };
        self.advance();
        if matches!(self.current().token, Token::LeftParen) {
            let args = self.parse_arguments()?;
            return Ok(format!("{}({})", name, args.join(", ")));
        }
        Ok(name)
    }

    /// Comma separated arguments; each argument is a run of terms,
    /// constants and comparison operators joined by single spaces
    fn parse_arguments(&mut self) -> FormulaResult<Vec<String>> {
        let open = self.current().start;
        self.open_paren(open)?;
        self.advance();

        let mut args = Vec::new();
        if self.eat(&Token::RightParen) {
            self.open_parens.pop();
            return Ok(args);
        }

        loop {
            let mut parts = Vec::new();
            loop {
                match self.current().token.clone() {
                    Token::Ident(_) => parts.push(self.parse_term()?),
                    Token::Const(value) => {
                        parts.push(value.to_string());
                        self.advance();
                    }
                    Token::Compare(op) => {
                        parts.push(op.to_string());
                        self.advance();
                    }
                    _ => break,
                }
            }
            if parts.is_empty() {
                return Err(self.unexpected());
            }
            args.push(parts.join(" "));

            if self.eat(&Token::Comma) {
                continue;
            }
            if self.eat(&Token::RightParen) {
                self.open_parens.pop();
                return Ok(args);
            }
            return Err(self.unexpected());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_precedence_and_associativity() {
        let e = parse("¬A ∧ B ∨ C → D → E").unwrap();
        assert_eq!(
            e,
            Expr::implies(
                Expr::or(
                    Expr::and(Expr::not(Expr::atom("A")), Expr::atom("B")),
                    Expr::atom("C")
                ),
                Expr::implies(Expr::atom("D"), Expr::atom("E"))
            )
        );
        let e = parse("A <-> B <-> C").unwrap();
        assert_eq!(
            e,
            Expr::iff(Expr::iff(Expr::atom("A"), Expr::atom("B")), Expr::atom("C"))
        );
    }

    #[test]
    fn test_predicate_whitespace_is_normalised() {
        assert_eq!(parse("loves( user ,cow_milk )").unwrap(), Expr::atom("loves(user, cow_milk)"));
        assert_eq!(parse("p(f(x,y), z)").unwrap(), Expr::atom("p(f(x, y), z)"));
    }

    #[test]
    fn test_comparison_atom() {
        let e = parse("time(rebuild) ≥ 12_months → ¬worth(rebuild)").unwrap();
        assert_eq!(
            e,
            Expr::implies(
                Expr::atom("time(rebuild) >= 12_months"),
                Expr::not(Expr::atom("worth(rebuild)"))
            )
        );
    }

    #[test]
    fn test_constants() {
        assert_eq!(parse("true ∧ ⊥").unwrap(), Expr::and(Expr::Const(true), Expr::Const(false)));
    }

    #[test]
    fn test_errors_carry_offset_and_fragment() {
        assert_eq!(parse("   "), Err(FormulaError::EmptyExpression));
        assert_eq!(
            parse("(A ∧ B"),
            Err(FormulaError::UnclosedParen { offset: 0, fragment: "(A ∧ B".into() })
        );
        assert_eq!(parse("A)"), Err(FormulaError::UnexpectedCloseParen { offset: 1 }));
        assert_eq!(
            parse("A B"),
            Err(FormulaError::TrailingInput { offset: 2, fragment: "B".into() })
        );
        assert_eq!(parse("A ∧"), Err(FormulaError::UnexpectedEnd { offset: 3 }));
        assert!(matches!(
            parse("A ∧ ∨ B"),
            Err(FormulaError::UnexpectedToken { offset: 4, .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let depth = MAX_NESTING + 1;
        let parens = format!("{}A{}", "(".repeat(depth), ")".repeat(depth));
        assert!(matches!(
            parse(&parens),
            Err(FormulaError::TooDeep { offset: 128, .. })
        ));

        let negations = format!("{}A", "¬".repeat(200_000));
        assert!(matches!(parse(&negations), Err(FormulaError::TooDeep { .. })));

        let chain = (0..400).map(|i| format!("a{}", i)).collect::<Vec<_>>().join(" → ");
        assert!(matches!(parse(&chain), Err(FormulaError::TooDeep { .. })));

        let nested_args = format!("p{}x{}", "(f".repeat(300), ")".repeat(300));
        assert!(matches!(parse(&nested_args), Err(FormulaError::TooDeep { .. })));

        let shallow = format!("{}A{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(parse(&shallow).unwrap(), Expr::atom("A"));
    }
}
