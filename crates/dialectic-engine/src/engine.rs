// Analysis engine
//
// Validates a request once, then runs the contradiction half (encoding, SAT,
// cores, proofs) and the structural half (graph rules) side by side on the
// same immutable argument set.

use std::collections::BTreeSet;

use dialectic_error::{EngineError, EngineResult, InputError};
use dialectic_graph::{analyze_structure, annotate, ArgumentGraph};
use dialectic_logic::{encode, find_contradictions, Budget, CancellationToken, Encoding, Exhaustion, Proof, ProofError};
use dialectic_types::{
    AnalysisReport, AnalysisRequest, ArgumentSet, Contradiction, Satisfiability, Severity, Warning, WarningSubject,
};
use tracing::{debug, error, info, info_span, warn};

use crate::config::EngineConfig;

/// What the contradiction half contributes to a report
#[derive(Debug)]
struct LogicOutcome {
    satisfiability: Satisfiability,
    contradictions: Vec<Contradiction>,
    degraded: bool,
    warnings: Vec<Warning>,
}

fn exhaustion_warning(exhaustion: Exhaustion, stage: &str) -> Warning {
    let error = match exhaustion {
        Exhaustion::Cancelled => EngineError::Cancelled,
        other => EngineError::SolverTimeout(format!("{} stopped: {}", stage, other)),
    };
    Warning::engine(&error)
}

/// Critical for small cores holding a certain member, Major for small cores
/// or certain members, Minor otherwise
fn severity(set: &ArgumentSet, core: &BTreeSet<usize>) -> Severity {
    let small = core.len() <= 3;
    let certain = core
        .iter()
        .any(|&i| set.propositions()[i].confidence.is_certain());
    match (small, certain) {
        (true, true) => Severity::Critical,
        (true, false) | (false, true) => Severity::Major,
        (false, false) => Severity::Minor,
    }
}

fn explanation(set: &ArgumentSet, core: &BTreeSet<usize>) -> String {
    let quoted: Vec<String> = core
        .iter()
        .map(|&i| format!("\"{}\"", set.propositions()[i].display_text()))
        .collect();
    format!(
        "Logical inconsistency among {} propositions: {}. These statements cannot all be true simultaneously.",
        core.len(),
        quoted.join(", ")
    )
}

/// Propositions whose clauses mention a variable of the core, input order
fn involved(encoding: &Encoding, core: &BTreeSet<usize>) -> Vec<usize> {
    let core_vars = encoding.vars_of(core);
    (0..encoding.proposition_count())
        .filter(|&i| {
            core.contains(&i)
                || encoding
                    .vars_of(&BTreeSet::from([i]))
                    .iter()
                    .any(|v| core_vars.contains(v))
        })
        .collect()
}

/// Verification engine for argument graphs
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine after validating `config`
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn budget(&self, token: &CancellationToken) -> Budget {
        Budget::new(self.config.solver.max_steps, Some(self.config.time_limit()), token.clone())
    }

    /// Analyze one request
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        self.analyze_with_token(request, &CancellationToken::new())
    }

    /// Analyze one request; cancelling `token` stops both halves at their
    /// next check and yields a degraded report
    pub fn analyze_with_token(&self, request: &AnalysisRequest, token: &CancellationToken) -> AnalysisReport {
        let span = info_span!(
            "analyze",
            propositions = request.propositions.len(),
            relationships = request.relationships.len()
        );
        let _enter = span.enter();

        let (set, warnings) = ArgumentSet::from_request(request);
        self.analyze_set(&set, warnings, token)
    }

    /// Analyze an already validated argument set; `warnings` from validation
    /// lead the report's warning list
    pub fn analyze_set(&self, set: &ArgumentSet, mut warnings: Vec<Warning>, token: &CancellationToken) -> AnalysisReport {
        if set.is_empty() {
            debug!("empty argument set, trivially satisfiable");
            return AnalysisReport::empty(warnings);
        }

        let logic_budget = self.budget(token);
        let graph_budget = self.budget(token);
        let (logic, structure) = rayon::join(
            || self.contradiction_half(set, &logic_budget),
            || analyze_structure(set, &self.config.graph, &graph_budget),
        );

        let graph = ArgumentGraph::new(set);
        let annotations = annotate(&graph, &structure.centrality, &structure.load_bearing, &logic.contradictions);

        warnings.extend(logic.warnings);
        warnings.extend(structure.warnings);
        let report = AnalysisReport {
            satisfiability: logic.satisfiability,
            contradictions: logic.contradictions,
            fallacies: structure.fallacies,
            biases: structure.biases,
            annotations,
            dependency_order: structure.dependency_order,
            degraded: logic.degraded || structure.degraded,
            warnings,
        };

        info!(
            satisfiability = %report.satisfiability,
            contradictions = report.contradictions.len(),
            fallacies = report.fallacies.len(),
            biases = report.biases.len(),
            warnings = report.warnings.len(),
            degraded = report.degraded,
            solver_steps = logic_budget.steps_used(),
            "analysis finished"
        );
        report
    }

    fn contradiction_half(&self, set: &ArgumentSet, budget: &Budget) -> LogicOutcome {
        let encoding = encode(set, &self.config.encoding);
        let mut warnings: Vec<Warning> = encoding
            .parse_failures
            .iter()
            .map(|(index, failure)| {
                let id = set.propositions()[*index].id.clone();
                warn!(proposition = %id, error = %failure, "formal expression treated as opaque");
                Warning::input(WarningSubject::Proposition(id), &InputError::ParseFailure(failure.clone()))
            })
            .collect();

        let search = find_contradictions(&encoding, budget, self.config.solver.max_contradictions);
        let mut degraded = false;
        if let Some(exhaustion) = search.exhausted {
            warn!(%exhaustion, cores = search.cores.len(), "contradiction search stopped early");
            warnings.push(exhaustion_warning(exhaustion, "contradiction search"));
            degraded = true;
        }

        let mut contradictions = Vec::with_capacity(search.cores.len());
        for core in &search.cores {
            let proof = Proof::construct(&encoding, set, core, budget).and_then(|proof| {
                proof.verify()?;
                Ok(proof)
            });
            let proof = match proof {
                Ok(proof) => proof,
                Err(ProofError::Exhausted(exhaustion)) => {
                    warn!(%exhaustion, "proof replay stopped, contradiction omitted");
                    warnings.push(exhaustion_warning(exhaustion, "proof construction"));
                    degraded = true;
                    continue;
                }
                Err(other) => {
                    error!(error = %other, "core could not be proved, contradiction omitted");
                    degraded = true;
                    continue;
                }
            };

            contradictions.push(Contradiction {
                id: format!("contradiction-{}", contradictions.len() + 1),
                proposition_ids: involved(&encoding, core)
                    .into_iter()
                    .map(|i| set.propositions()[i].id.clone())
                    .collect(),
                minimal_core: core.iter().map(|&i| set.propositions()[i].id.clone()).collect(),
                severity: severity(set, core),
                formal_proof: proof.render(&encoding.vars),
                human_explanation: explanation(set, core),
            });
        }

        LogicOutcome {
            satisfiability: search.satisfiability,
            contradictions,
            degraded,
            warnings,
        }
    }
}
