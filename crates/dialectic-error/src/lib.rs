// Dialectic Error Handling Framework
// Central location for error types, codes, and the shared error trait

use std::fmt;

// Re-export for crates that build their own error enums
pub use thiserror;

mod engine;
mod formula;
mod input;

pub use engine::{EngineError, EngineResult};
pub use formula::{FormulaError, FormulaResult};
pub use input::{InputError, InputResult};

/// Error domains representing the components of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDomain {
    Formula,
    Input,
    Engine,
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDomain::Formula => write!(f, "formula"),
            ErrorDomain::Input => write!(f, "input"),
            ErrorDomain::Engine => write!(f, "engine"),
        }
    }
}

/// Error code structure for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ErrorCode(pub u32);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Base trait for every error in the engine.
///
/// Errors never cross the engine boundary as failures; they are converted
/// into structured warnings, which carry the code and the symbolic name.
pub trait DialecticError: std::error::Error + Send + Sync + 'static {
    /// Numeric code, unique across domains
    fn code(&self) -> ErrorCode;

    /// Component the error originates from
    fn domain(&self) -> ErrorDomain;

    /// Stable symbolic name, e.g. `FORMULA_UNEXPECTED_TOKEN`
    fn code_name(&self) -> &'static str;
}
