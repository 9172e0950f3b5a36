// Configuration for the Dialectic engine
//
// Budgets, encoding policy, graph bounds and pool sizing. Loaded from TOML;
// missing keys take their defaults.

use std::path::Path;
use std::time::Duration;

use dialectic_error::{EngineError, EngineResult};
use dialectic_graph::GraphOptions;
use dialectic_logic::{AttackPolicy, EncodingOptions};
use dialectic_types::Strength;
use serde::{Deserialize, Serialize};

/// SAT budget and contradiction limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Decision nodes per contradiction half, shared by its search, core
    /// extraction and proof replay. The graph half is bounded by the time
    /// limit only.
    pub max_steps: u64,

    /// Wall-clock limit per analysis half
    pub time_limit_ms: u64,

    /// Disjoint contradictions reported per request
    pub max_contradictions: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            time_limit_ms: 2_000,
            max_contradictions: 8,
        }
    }
}

/// Worker pool sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// 0 uses one thread per available core
    pub worker_threads: usize,
}

/// Configuration for the Dialectic engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub solver: SolverConfig,
    pub encoding: EncodingOptions,
    pub graph: GraphOptions,
    pub pool: PoolConfig,
}

impl EngineConfig {
    /// Create a new engine configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigIo(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML configuration text
    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> EngineResult<String> {
        toml::to_string(self).map_err(|e| EngineError::ConfigParse(e.to_string()))
    }

    /// Reject values no analysis can run with
    pub fn validate(&self) -> EngineResult<()> {
        if self.solver.max_steps == 0 {
            return Err(EngineError::invalid_config("solver.max_steps must be greater than 0"));
        }
        if self.solver.time_limit_ms == 0 {
            return Err(EngineError::invalid_config("solver.time_limit_ms must be greater than 0"));
        }
        if self.graph.max_cycle_length < 2 {
            return Err(EngineError::invalid_config("graph.max_cycle_length must be at least 2"));
        }
        if self.graph.max_cycles == 0 {
            return Err(EngineError::invalid_config("graph.max_cycles must be greater than 0"));
        }
        let threshold = self.graph.load_bearing_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(EngineError::invalid_config(format!(
                "graph.load_bearing_threshold must lie in [0, 1], got {}",
                threshold
            )));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.solver.time_limit_ms)
    }

    /// Set the decision-node budget
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.solver.max_steps = max_steps;
        self
    }

    /// Set the wall-clock limit per analysis half
    pub fn with_time_limit_ms(mut self, time_limit_ms: u64) -> Self {
        self.solver.time_limit_ms = time_limit_ms;
        self
    }

    /// Set the number of contradictions reported
    pub fn with_max_contradictions(mut self, max: usize) -> Self {
        self.solver.max_contradictions = max;
        self
    }

    /// Set how `attacks` relationships are encoded
    pub fn with_attack_policy(mut self, policy: AttackPolicy) -> Self {
        self.encoding.attack_policy = policy;
        self
    }

    /// Set the weakest `supports` strength that is encoded
    pub fn with_min_support_strength(mut self, strength: Strength) -> Self {
        self.encoding.min_support_strength = strength;
        self
    }

    /// Set the cycle length and count bounds
    pub fn with_cycle_bounds(mut self, max_cycle_length: usize, max_cycles: usize) -> Self {
        self.graph.max_cycle_length = max_cycle_length;
        self.graph.max_cycles = max_cycles;
        self
    }

    /// Set the load-bearing centrality threshold
    pub fn with_load_bearing_threshold(mut self, threshold: f64) -> Self {
        self.graph.load_bearing_threshold = threshold;
        self
    }

    /// Set the worker pool size
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.pool.worker_threads = threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.solver.max_steps, 1_000_000);
        assert_eq!(config.solver.time_limit_ms, 2_000);
        assert_eq!(config.solver.max_contradictions, 8);
        assert_eq!(config.encoding.attack_policy, AttackPolicy::Inert);
        assert_eq!(config.encoding.min_support_strength, Strength::Moderate);
        assert_eq!(config.graph.max_cycle_length, 8);
        assert_eq!(config.graph.max_cycles, 256);
        assert_eq!(config.graph.load_bearing_threshold, 0.3);
        assert_eq!(config.pool.worker_threads, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::new()
            .with_max_steps(10)
            .with_time_limit_ms(50)
            .with_max_contradictions(2)
            .with_attack_policy(AttackPolicy::Contradicts)
            .with_cycle_bounds(4, 16)
            .with_load_bearing_threshold(0.5)
            .with_worker_threads(3);

        assert_eq!(config.solver.max_steps, 10);
        assert_eq!(config.time_limit(), Duration::from_millis(50));
        assert_eq!(config.solver.max_contradictions, 2);
        assert_eq!(config.encoding.attack_policy, AttackPolicy::Contradicts);
        assert_eq!(config.graph.max_cycle_length, 4);
        assert_eq!(config.graph.max_cycles, 16);
        assert_eq!(config.pool.worker_threads, 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [solver]
            max_steps = 500

            [encoding]
            attack_policy = "contradicts"
            min_support_strength = "weak"
            "#,
        )
        .unwrap();
        assert_eq!(config.solver.max_steps, 500);
        assert_eq!(config.solver.time_limit_ms, 2_000);
        assert_eq!(config.encoding.attack_policy, AttackPolicy::Contradicts);
        assert_eq!(config.encoding.min_support_strength, Strength::Weak);
        assert_eq!(config.graph, GraphOptions::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            EngineConfig::new().with_max_steps(0).validate(),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::new().with_load_bearing_threshold(1.5).validate(),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[graph]\nmax_cycle_length = 1\n"),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[solver\n"),
            Err(EngineError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::new().with_cycle_bounds(5, 10);
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
