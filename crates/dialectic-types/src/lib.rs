// Dialectic Types
//
// Shared model for the argument verification engine: propositions,
// relationships, lenient request shapes, boundary validation and the
// report records produced by an analysis.

pub mod ids;
pub mod proposition;
pub mod raw;
pub mod relationship;
pub mod report;
pub mod validation;
pub mod warning;

pub use ids::{PropositionId, RelationshipId};
pub use proposition::{Confidence, Proposition, PropositionKind};
pub use raw::{AnalysisRequest, RawProposition, RawRelationship};
pub use relationship::{Relationship, RelationshipKind, Strength};
pub use report::{
    AnalysisReport, Bias, BiasSeverity, BiasType, Contradiction, Fallacy, FormalProof, Justification,
    PatternType, PropositionAnnotation, ProofLine, Satisfiability, Severity,
};
pub use validation::ArgumentSet;
pub use warning::{Warning, WarningKind, WarningSubject};
