// Dialectic Engine
//
// Request orchestration for the argument verification engine: runtime
// configuration, the two-half analysis pipeline, a batch worker pool and
// tracing setup.

pub mod config;
pub mod engine;
pub mod pool;
pub mod tracing;

pub use config::{EngineConfig, PoolConfig, SolverConfig};
pub use engine::Engine;
pub use pool::AnalysisPool;

pub use dialectic_graph::GraphOptions;
pub use dialectic_logic::{AttackPolicy, CancellationToken, EncodingOptions};
pub use dialectic_types::{AnalysisReport, AnalysisRequest};
