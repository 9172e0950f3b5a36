// Dialectic Graph
//
// Structural side of the engine: the relationship graph, bounded cycle
// enumeration, betweenness centrality, fallacy and bias rules, dependency
// order and per-proposition scoring.

pub mod analysis;
pub mod biases;
pub mod centrality;
pub mod cycles;
pub mod graph;
pub mod order;
pub mod patterns;
pub mod scoring;

pub use analysis::{analyze_structure, GraphOptions, StructuralAnalysis};
pub use biases::detect_biases;
pub use centrality::{betweenness, dependents, distances_from, Centrality};
pub use cycles::{find_cycles, CycleSearch};
pub use graph::{ArgumentGraph, Edge};
pub use order::dependency_order;
pub use scoring::annotate;
