// Structural analysis
// Runs the graph rules over one argument set under a budget.

use dialectic_error::EngineError;
use dialectic_logic::{Budget, Exhaustion};
use dialectic_types::{ArgumentSet, Bias, Fallacy, PropositionId, Warning};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::biases::detect_biases;
use crate::centrality::{betweenness, Centrality};
use crate::cycles::find_cycles;
use crate::graph::ArgumentGraph;
use crate::order::dependency_order;
use crate::patterns;

/// Bounds and thresholds for the graph half
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Longest cycle reported, in propositions
    pub max_cycle_length: usize,
    pub max_cycles: usize,
    /// Centrality above which an assumption is load-bearing
    pub load_bearing_threshold: f64,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            max_cycle_length: 8,
            max_cycles: 256,
            load_bearing_threshold: 0.3,
        }
    }
}

/// Everything the graph half produces for one request
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralAnalysis {
    pub fallacies: Vec<Fallacy>,
    pub biases: Vec<Bias>,
    pub centrality: Centrality,
    /// Per proposition, by input index
    pub load_bearing: Vec<bool>,
    pub dependency_order: Vec<PropositionId>,
    pub degraded: bool,
    pub warnings: Vec<Warning>,
}

fn exhaustion_warning(exhaustion: Exhaustion, stage: &str) -> Warning {
    let error = match exhaustion {
        Exhaustion::Cancelled => EngineError::Cancelled,
        other => EngineError::CycleBudgetExhausted(format!("{} stopped: {}", stage, other)),
    };
    Warning::engine(&error)
}

/// Detect structural fallacies, biases, centrality and dependency order
pub fn analyze_structure(set: &ArgumentSet, options: &GraphOptions, budget: &Budget) -> StructuralAnalysis {
    let graph = ArgumentGraph::new(set);
    let mut warnings = Vec::new();
    let mut degraded = false;

    let search = find_cycles(
        &graph.support_chain_adjacency(),
        options.max_cycle_length,
        options.max_cycles,
        budget,
    );
    if search.truncated {
        warn!(limit = options.max_cycles, "cycle enumeration hit the cycle count limit");
        warnings.push(Warning::engine(&EngineError::CycleBudgetExhausted(format!(
            "stopped after {} cycles",
            options.max_cycles
        ))));
        degraded = true;
    }
    if let Some(exhaustion) = search.exhausted {
        warn!(%exhaustion, "cycle enumeration stopped early");
        warnings.push(exhaustion_warning(exhaustion, "cycle enumeration"));
        degraded = true;
    }

    let adjacency = graph.undirected_adjacency();
    let centrality = match betweenness(&adjacency, budget) {
        Ok(centrality) => centrality,
        Err(exhaustion) => {
            warn!(%exhaustion, "centrality analysis stopped early");
            warnings.push(exhaustion_warning(exhaustion, "centrality analysis"));
            degraded = true;
            Centrality::zero(graph.node_count())
        }
    };

    let threshold = options.load_bearing_threshold;
    let mut load_bearing = vec![false; graph.node_count()];
    for node in patterns::load_bearing_nodes(&graph, &centrality, threshold) {
        load_bearing[node] = true;
    }

    let mut fallacies = patterns::circular_reasoning(&graph, &search.cycles);
    fallacies.extend(patterns::hasty_generalizations(&graph));
    fallacies.extend(patterns::false_dilemmas(&graph));
    fallacies.extend(patterns::load_bearing_assumptions(&graph, &adjacency, &centrality, threshold));

    let biases = detect_biases(&graph, &centrality);
    let order = dependency_order(&graph);

    debug!(
        nodes = graph.node_count(),
        edges = graph.edges().len(),
        cycles = search.cycles.len(),
        fallacies = fallacies.len(),
        biases = biases.len(),
        degraded,
        "structural analysis finished"
    );

    StructuralAnalysis {
        fallacies,
        biases,
        centrality,
        load_bearing,
        dependency_order: graph.ids(&order),
        degraded,
        warnings,
    }
}
