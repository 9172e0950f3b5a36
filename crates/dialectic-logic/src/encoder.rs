// Argument encoder
// Lowers validated propositions and relationships into one tagged clause
// list over a shared variable table.

use std::collections::BTreeSet;

use dialectic_error::FormulaError;
use dialectic_types::{ArgumentSet, Proposition, Relationship, RelationshipKind, Strength};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cnf::{definition, to_cnf, Clause, Lit, Var, VarTable};
use crate::parser::parse;

/// How `attacks` relationships enter the formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackPolicy {
    /// Rhetorical only, no clause
    #[default]
    Inert,
    /// Encoded like `contradicts`
    Contradicts,
}

/// Encoding options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingOptions {
    pub attack_policy: AttackPolicy,
    /// Weaker `supports` edges are not encoded
    pub min_support_strength: Strength,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            attack_policy: AttackPolicy::Inert,
            min_support_strength: Strength::Moderate,
        }
    }
}

/// Where a clause came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseOrigin {
    /// The proposition's own formal expression
    Expression,
    /// Links the proposition's variable to the conclusion of its expression
    Definition,
    /// Asserts a proposition without a usable expression
    Opaque,
    /// Relationship at this input index
    Relationship(usize),
}

/// A clause with the propositions it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedClause {
    pub clause: Clause,
    /// Input indices of the originating propositions, sorted
    pub tags: Vec<usize>,
    pub origin: ClauseOrigin,
    /// Source text quoted in proofs
    pub source: String,
}

/// The formula of one argument set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoding {
    pub vars: VarTable,
    pub clauses: Vec<TaggedClause>,
    /// Propositions whose expression could not be used, by input index
    pub parse_failures: Vec<(usize, FormulaError)>,
    proposition_count: usize,
}

impl Encoding {
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn proposition_count(&self) -> usize {
        self.proposition_count
    }

    /// Synthetic variable of the proposition at `index`
    pub fn proposition_var(&self, index: usize) -> Var {
        Var(index as u32)
    }

    /// Clauses whose tags all lie in `members`, with their indices
    pub fn restrict(&self, members: &BTreeSet<usize>) -> (Vec<Clause>, Vec<usize>) {
        self.clauses
            .iter()
            .enumerate()
            .filter(|(_, tagged)| tagged.tags.iter().all(|t| members.contains(t)))
            .map(|(index, tagged)| (tagged.clause.clone(), index))
            .unzip()
    }

    /// Propositions that own at least one clause
    pub fn contributing(&self) -> BTreeSet<usize> {
        self.clauses.iter().flat_map(|c| c.tags.iter().copied()).collect()
    }

    /// Variables occurring in clauses tagged with any of `members`
    pub fn vars_of(&self, members: &BTreeSet<usize>) -> BTreeSet<Var> {
        self.clauses
            .iter()
            .filter(|c| c.tags.iter().any(|t| members.contains(t)))
            .flat_map(|c| c.clause.lits().iter().map(|lit| lit.var()))
            .collect()
    }
}

/// Encode an argument set.
///
/// Proposition variables are minted first, in input order, so the
/// proposition at index `i` owns variable `i`. Proposition clauses come
/// first, then relationship clauses, both in input order.
pub fn encode(set: &ArgumentSet, options: &EncodingOptions) -> Encoding {
    let mut encoding = Encoding {
        proposition_count: set.len(),
        ..Encoding::default()
    };
    for proposition in set.propositions() {
        encoding.vars.proposition(&proposition.id);
    }

    for (index, proposition) in set.propositions().iter().enumerate() {
        encode_proposition(&mut encoding, index, proposition);
    }

    for (position, relationship) in set.relationships().iter().enumerate() {
        let (Some(from), Some(to)) = (
            set.index_of(&relationship.from_id),
            set.index_of(&relationship.to_id),
        ) else {
            continue;
        };
        if let Some(clause) = relationship_clause(relationship, from, to, options) {
            if clause.is_tautology() {
                continue;
            }
            let mut tags = vec![from, to];
            tags.sort_unstable();
            tags.dedup();
            encoding.clauses.push(TaggedClause {
                clause,
                tags,
                origin: ClauseOrigin::Relationship(position),
                source: relationship_source(relationship),
            });
        }
    }

    debug!(
        propositions = set.len(),
        vars = encoding.vars.len(),
        clauses = encoding.clauses.len(),
        parse_failures = encoding.parse_failures.len(),
        "encoded argument set"
    );
    encoding
}

fn encode_proposition(encoding: &mut Encoding, index: usize, proposition: &Proposition) {
    let var = Var(index as u32);
    let opaque = |encoding: &mut Encoding| {
        encoding.clauses.push(TaggedClause {
            clause: Clause::new(vec![Lit::positive(var)]),
            tags: vec![index],
            origin: ClauseOrigin::Opaque,
            source: format!("\"{}\" asserted", proposition.display_text()),
        });
    };

    let Some(text) = proposition.formal_expression.as_deref() else {
        opaque(encoding);
        return;
    };

    let lowered = parse(text).and_then(|expr| {
        let body = to_cnf(&expr, &mut encoding.vars)?;
        let conclusion = expr.conclusion();
        let link = definition(var, conclusion, &mut encoding.vars)?;
        Ok((body, link, conclusion.to_string()))
    });

    match lowered {
        Ok((body, link, conclusion)) => {
            for clause in body {
                encoding.clauses.push(TaggedClause {
                    clause,
                    tags: vec![index],
                    origin: ClauseOrigin::Expression,
                    source: text.trim().to_string(),
                });
            }
            for clause in link {
                encoding.clauses.push(TaggedClause {
                    clause,
                    tags: vec![index],
                    origin: ClauseOrigin::Definition,
                    source: format!("[{}] ↔ {}", proposition.id, conclusion),
                });
            }
        }
        Err(error) => {
            debug!(proposition = %proposition.id, %error, "formal expression unusable");
            encoding.parse_failures.push((index, error));
            opaque(encoding);
        }
    }
}

fn relationship_clause(
    relationship: &Relationship,
    from: usize,
    to: usize,
    options: &EncodingOptions,
) -> Option<Clause> {
    let a = Var(from as u32);
    let b = Var(to as u32);
    let implies = || Clause::new(vec![Lit::negative(a), Lit::positive(b)]);
    let excludes = || Clause::new(vec![Lit::negative(a), Lit::negative(b)]);
    match relationship.kind {
        RelationshipKind::Supports if relationship.strength >= options.min_support_strength => {
            Some(implies())
        }
        RelationshipKind::Supports => None,
        RelationshipKind::DependsOn | RelationshipKind::Assumes => Some(implies()),
        RelationshipKind::Contradicts => Some(excludes()),
        RelationshipKind::Attacks => match options.attack_policy {
            AttackPolicy::Inert => None,
            AttackPolicy::Contradicts => Some(excludes()),
        },
    }
}

fn relationship_source(relationship: &Relationship) -> String {
    let base = format!(
        "{} {} {}",
        relationship.from_id, relationship.kind, relationship.to_id
    );
    match relationship.label.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => format!("{} ({})", base, label),
        _ => base,
    }
}
