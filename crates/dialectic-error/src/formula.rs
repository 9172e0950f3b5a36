// Formula-specific error types
// Raised by the formal-expression lexer and parser

use thiserror::Error;
use crate::{DialecticError, ErrorCode, ErrorDomain};

/// Formula error codes
pub mod codes {
    use crate::ErrorCode;

    // Formula error codes start with 1000
    pub const EMPTY_EXPRESSION: ErrorCode = ErrorCode(1001);
    pub const UNEXPECTED_CHAR: ErrorCode = ErrorCode(1002);
    pub const UNEXPECTED_TOKEN: ErrorCode = ErrorCode(1003);
    pub const UNEXPECTED_END: ErrorCode = ErrorCode(1004);
    pub const UNCLOSED_PAREN: ErrorCode = ErrorCode(1005);
    pub const UNEXPECTED_CLOSE_PAREN: ErrorCode = ErrorCode(1006);
    pub const TRAILING_INPUT: ErrorCode = ErrorCode(1007);
    pub const TOO_LARGE: ErrorCode = ErrorCode(1008);
    pub const TOO_DEEP: ErrorCode = ErrorCode(1009);
}

/// Errors produced while turning a formal-expression string into a tree.
///
/// Offsets are character offsets into the original string; `fragment` is
/// the offending substring starting at that offset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Empty expression")]
    EmptyExpression,

    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Unexpected {found} at offset {offset} in '{fragment}'")]
    UnexpectedToken {
        found: String,
        offset: usize,
        fragment: String,
    },

    #[error("Unexpected end of expression at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("Unclosed parenthesis at offset {offset} in '{fragment}'")]
    UnclosedParen { offset: usize, fragment: String },

    #[error("Unexpected closing parenthesis at offset {offset}")]
    UnexpectedCloseParen { offset: usize },

    #[error("Trailing input at offset {offset}: '{fragment}'")]
    TrailingInput { offset: usize, fragment: String },

    /// Distribution to CNF would exceed the clause limit
    #[error("Expression expands to more than {limit} clauses")]
    TooLarge { limit: usize },

    #[error("Expression nests deeper than {limit} levels at offset {offset} in '{fragment}'")]
    TooDeep {
        limit: usize,
        offset: usize,
        fragment: String,
    },
}

impl FormulaError {
    /// Character offset of the failure, when one is known
    pub fn offset(&self) -> Option<usize> {
        match self {
            FormulaError::EmptyExpression | FormulaError::TooLarge { .. } => None,
            FormulaError::UnexpectedChar { offset, .. }
            | FormulaError::UnexpectedToken { offset, .. }
            | FormulaError::UnexpectedEnd { offset }
            | FormulaError::UnclosedParen { offset, .. }
            | FormulaError::UnexpectedCloseParen { offset }
            | FormulaError::TrailingInput { offset, .. }
            | FormulaError::TooDeep { offset, .. } => Some(*offset),
        }
    }

    /// Offending substring of the source, when one is known
    pub fn fragment(&self) -> Option<String> {
        match self {
            FormulaError::UnexpectedChar { ch, .. } => Some(ch.to_string()),
            FormulaError::UnexpectedToken { fragment, .. }
            | FormulaError::UnclosedParen { fragment, .. }
            | FormulaError::TrailingInput { fragment, .. }
            | FormulaError::TooDeep { fragment, .. } => Some(fragment.clone()),
            FormulaError::UnexpectedCloseParen { .. } => Some(")".to_string()),
            FormulaError::EmptyExpression
            | FormulaError::UnexpectedEnd { .. }
            | FormulaError::TooLarge { .. } => None,
        }
    }
}

impl DialecticError for FormulaError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            FormulaError::EmptyExpression => EMPTY_EXPRESSION,
            FormulaError::UnexpectedChar { .. } => UNEXPECTED_CHAR,
            FormulaError::UnexpectedToken { .. } => UNEXPECTED_TOKEN,
            FormulaError::UnexpectedEnd { .. } => UNEXPECTED_END,
            FormulaError::UnclosedParen { .. } => UNCLOSED_PAREN,
            FormulaError::UnexpectedCloseParen { .. } => UNEXPECTED_CLOSE_PAREN,
            FormulaError::TrailingInput { .. } => TRAILING_INPUT,
            FormulaError::TooLarge { .. } => TOO_LARGE,
            FormulaError::TooDeep { .. } => TOO_DEEP,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Formula
    }

    fn code_name(&self) -> &'static str {
        match self {
            FormulaError::EmptyExpression => "FORMULA_EMPTY_EXPRESSION",
            FormulaError::UnexpectedChar { .. } => "FORMULA_UNEXPECTED_CHAR",
            FormulaError::UnexpectedToken { .. } => "FORMULA_UNEXPECTED_TOKEN",
            FormulaError::UnexpectedEnd { .. } => "FORMULA_UNEXPECTED_END",
            FormulaError::UnclosedParen { .. } => "FORMULA_UNCLOSED_PAREN",
            FormulaError::UnexpectedCloseParen { .. } => "FORMULA_UNEXPECTED_CLOSE_PAREN",
            FormulaError::TrailingInput { .. } => "FORMULA_TRAILING_INPUT",
            FormulaError::TooLarge { .. } => "FORMULA_TOO_LARGE",
            FormulaError::TooDeep { .. } => "FORMULA_TOO_DEEP",
        }
    }
}

/// Convenient Result type for formula operations
pub type FormulaResult<T> = Result<T, FormulaError>;
