// Validation module for analysis requests
// Converts lenient raw records into the strict model. Malformed records are
// skipped with a warning; nothing here fails the request.

use std::collections::HashMap;
use std::str::FromStr;

use dialectic_error::InputError;
use tracing::debug;

use crate::{
    AnalysisRequest, Confidence, Proposition, PropositionId, PropositionKind, RawProposition,
    RawRelationship, Relationship, RelationshipId, RelationshipKind, Strength, Warning,
    WarningSubject,
};

/// The validated propositions and relationships of one request, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentSet {
    propositions: Vec<Proposition>,
    relationships: Vec<Relationship>,
    index: HashMap<PropositionId, usize>,
}

impl ArgumentSet {
    /// Build a set from already-typed records, applying the same checks as
    /// [`ArgumentSet::from_request`]
    pub fn new(propositions: Vec<Proposition>, relationships: Vec<Relationship>) -> (Self, Vec<Warning>) {
        Self::from_request(&AnalysisRequest::from_model(&propositions, &relationships))
    }

    /// Validate a raw request
    pub fn from_request(request: &AnalysisRequest) -> (Self, Vec<Warning>) {
        let mut warnings = Vec::new();
        let mut set = ArgumentSet::default();

        for (position, raw) in request.propositions.iter().enumerate() {
            if let Some(proposition) = validate_proposition(position, raw, &set.index, &mut warnings) {
                set.index.insert(proposition.id.clone(), set.propositions.len());
                set.propositions.push(proposition);
            }
        }

        for (position, raw) in request.relationships.iter().enumerate() {
            if let Some(relationship) = validate_relationship(position, raw, &set.index, &mut warnings) {
                set.relationships.push(relationship);
            }
        }

        debug!(
            propositions = set.propositions.len(),
            relationships = set.relationships.len(),
            warnings = warnings.len(),
            "validated analysis request"
        );
        (set, warnings)
    }

    pub fn propositions(&self) -> &[Proposition] {
        &self.propositions
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Look up a proposition by id
    pub fn get(&self, id: &PropositionId) -> Option<&Proposition> {
        self.index.get(id).map(|&i| &self.propositions[i])
    }

    /// Input position of a proposition
    pub fn index_of(&self, id: &PropositionId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.propositions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Validate one proposition record
fn validate_proposition(
    position: usize,
    raw: &RawProposition,
    seen: &HashMap<PropositionId, usize>,
    warnings: &mut Vec<Warning>,
) -> Option<Proposition> {
    let Some(id) = non_blank(&raw.id).map(PropositionId::new) else {
        warnings.push(Warning::input(
            WarningSubject::PropositionAt(position),
            &InputError::MissingField("id"),
        ));
        return None;
    };
    let subject = || WarningSubject::Proposition(id.clone());

    if seen.contains_key(&id) {
        warnings.push(Warning::input(subject(), &InputError::DuplicateId(id.to_string())));
        return None;
    }

    let kind = match non_blank(&raw.kind).map(PropositionKind::from_str) {
        Some(Ok(kind)) => kind,
        Some(Err(error)) => {
            warnings.push(Warning::input(subject(), &error));
            return None;
        }
        None => {
            warnings.push(Warning::input(subject(), &InputError::MissingField("kind")));
            return None;
        }
    };

    let confidence = match non_blank(&raw.confidence).map(Confidence::from_str) {
        Some(Ok(confidence)) => confidence,
        Some(Err(error)) => {
            warnings.push(Warning::input(subject(), &error));
            Confidence::Medium
        }
        None => Confidence::Medium,
    };

    let mut proposition = Proposition::new(id, kind)
        .with_statement(raw.statement.clone().unwrap_or_default())
        .with_confidence(confidence);
    if let Some(expression) = &raw.formal_expression {
        proposition = proposition.with_expression(expression.clone());
    }
    proposition.is_implicit = raw.is_implicit.unwrap_or(false);
    proposition.is_load_bearing = raw.is_load_bearing.unwrap_or(false);
    Some(proposition)
}

/// Validate one relationship record
fn validate_relationship(
    position: usize,
    raw: &RawRelationship,
    known: &HashMap<PropositionId, usize>,
    warnings: &mut Vec<Warning>,
) -> Option<Relationship> {
    let id = match non_blank(&raw.id) {
        Some(id) => RelationshipId::new(id),
        None => {
            warnings.push(Warning::input(
                WarningSubject::RelationshipAt(position),
                &InputError::MissingField("id"),
            ));
            RelationshipId::new(format!("#{}", position))
        }
    };
    let subject = || WarningSubject::Relationship(id.clone());

    let (Some(from), Some(to)) = (non_blank(&raw.from_id), non_blank(&raw.to_id)) else {
        let field = if non_blank(&raw.from_id).is_none() { "from_id" } else { "to_id" };
        warnings.push(Warning::input(subject(), &InputError::MissingField(field)));
        return None;
    };
    let from = PropositionId::new(from);
    let to = PropositionId::new(to);

    let mut missing: Vec<&str> = [&from, &to]
        .into_iter()
        .filter(|endpoint| !known.contains_key(*endpoint))
        .map(PropositionId::as_str)
        .collect();
    missing.dedup();
    if !missing.is_empty() {
        warnings.push(Warning::input(subject(), &InputError::dangling(missing.join(", "))));
        return None;
    }

    let kind = match non_blank(&raw.kind).map(RelationshipKind::from_str) {
        Some(Ok(kind)) => kind,
        Some(Err(error)) => {
            warnings.push(Warning::input(subject(), &error));
            return None;
        }
        None => {
            warnings.push(Warning::input(subject(), &InputError::MissingField("kind")));
            return None;
        }
    };

    let strength = match non_blank(&raw.strength).map(Strength::from_str) {
        Some(Ok(strength)) => strength,
        Some(Err(error)) => {
            warnings.push(Warning::input(subject(), &error));
            Strength::Moderate
        }
        None => Strength::Moderate,
    };

    Some(Relationship {
        id,
        from_id: from,
        to_id: to,
        kind,
        strength,
        label: raw.label.clone(),
    })
}
