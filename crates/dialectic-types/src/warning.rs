// Structured warnings
// Every recovered failure surfaces here instead of crossing the engine boundary.

use serde::{Deserialize, Serialize};
use dialectic_error::{DialecticError, EngineError, ErrorCode, InputError};

use crate::{PropositionId, RelationshipId};

/// What a warning is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum WarningSubject {
    Proposition(PropositionId),
    Relationship(RelationshipId),
    /// A proposition record without a usable id, by position in the request
    PropositionAt(usize),
    /// A relationship record without a usable id, by position in the request
    RelationshipAt(usize),
    /// The request as a whole (budget exhaustion, cancellation)
    Request,
}

/// Category of a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    ParseFailure,
    DanglingReference,
    DuplicateId,
    MissingField,
    UnknownVariant,
    SolverTimeout,
    CycleBudgetExhausted,
    Cancelled,
}

/// A skipped or degraded input, or a degraded half of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub subject: WarningSubject,
    pub kind: WarningKind,
    pub code: ErrorCode,
    pub code_name: String,
    pub message: String,
    /// Offending substring for parse failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
}

impl Warning {
    /// Build a warning from an input validation error
    pub fn input(subject: WarningSubject, error: &InputError) -> Self {
        let kind = match error {
            InputError::MissingField(_) => WarningKind::MissingField,
            InputError::DuplicateId(_) => WarningKind::DuplicateId,
            InputError::UnknownVariant { .. } => WarningKind::UnknownVariant,
            InputError::DanglingReference { .. } => WarningKind::DanglingReference,
            InputError::ParseFailure(_) => WarningKind::ParseFailure,
        };
        let fragment = match error {
            InputError::ParseFailure(inner) => inner.fragment(),
            _ => None,
        };
        Self::from_error(subject, kind, error, fragment)
    }

    /// Build a request-level warning from an engine error
    pub fn engine(error: &EngineError) -> Self {
        let kind = match error {
            EngineError::CycleBudgetExhausted(_) => WarningKind::CycleBudgetExhausted,
            EngineError::Cancelled => WarningKind::Cancelled,
            _ => WarningKind::SolverTimeout,
        };
        Self::from_error(WarningSubject::Request, kind, error, None)
    }

    fn from_error(
        subject: WarningSubject,
        kind: WarningKind,
        error: &dyn DialecticError,
        fragment: Option<String>,
    ) -> Self {
        Self {
            subject,
            kind,
            code: error.code(),
            code_name: error.code_name().to_string(),
            message: error.to_string(),
            fragment,
        }
    }
}
