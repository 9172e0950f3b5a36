// Input-specific error types
// Raised while validating raw propositions and relationships at the boundary

use thiserror::Error;
use crate::{DialecticError, ErrorCode, ErrorDomain};

/// Input error codes
pub mod codes {
    use crate::ErrorCode;

    // Input error codes start with 2000
    pub const MISSING_FIELD: ErrorCode = ErrorCode(2001);
    pub const DUPLICATE_ID: ErrorCode = ErrorCode(2002);
    pub const UNKNOWN_VARIANT: ErrorCode = ErrorCode(2003);
    pub const DANGLING_REFERENCE: ErrorCode = ErrorCode(2004);
    pub const PARSE_FAILURE: ErrorCode = ErrorCode(2005);
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A required field is absent or blank
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// An id was already used by an earlier record of the same batch
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// A field holds a value outside its closed set
    #[error("Unknown {field} '{value}'")]
    UnknownVariant { field: &'static str, value: String },

    /// A relationship names a proposition that is not in the batch
    #[error("Relationship references unknown proposition '{missing}'")]
    DanglingReference { missing: String },

    /// A proposition's formal expression could not be parsed
    #[error("Formal expression could not be parsed: {0}")]
    ParseFailure(#[from] crate::FormulaError),
}

impl DialecticError for InputError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            InputError::MissingField(_) => MISSING_FIELD,
            InputError::DuplicateId(_) => DUPLICATE_ID,
            InputError::UnknownVariant { .. } => UNKNOWN_VARIANT,
            InputError::DanglingReference { .. } => DANGLING_REFERENCE,
            InputError::ParseFailure(_) => PARSE_FAILURE,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Input
    }

    fn code_name(&self) -> &'static str {
        match self {
            InputError::MissingField(_) => "INPUT_MISSING_FIELD",
            InputError::DuplicateId(_) => "INPUT_DUPLICATE_ID",
            InputError::UnknownVariant { .. } => "INPUT_UNKNOWN_VARIANT",
            InputError::DanglingReference { .. } => "INPUT_DANGLING_REFERENCE",
            InputError::ParseFailure(_) => "INPUT_PARSE_FAILURE",
        }
    }
}

/// Convenient Result type for input validation
pub type InputResult<T> = Result<T, InputError>;

// Helper methods for creating input errors
impl InputError {
    /// Create a new unknown-variant error
    pub fn unknown_variant(field: &'static str, value: impl Into<String>) -> Self {
        InputError::UnknownVariant { field, value: value.into() }
    }

    /// Create a new dangling-reference error
    pub fn dangling(missing: impl Into<String>) -> Self {
        InputError::DanglingReference { missing: missing.into() }
    }
}
