// Worker pool
// Independent requests analysed in parallel on a dedicated rayon pool.

use std::sync::Arc;

use dialectic_error::{EngineError, EngineResult};
use dialectic_logic::CancellationToken;
use dialectic_types::{AnalysisReport, AnalysisRequest};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::info;

use crate::config::EngineConfig;
use crate::engine::Engine;

/// A shared engine plus the threads that run it
pub struct AnalysisPool {
    engine: Arc<Engine>,
    pool: ThreadPool,
    token: CancellationToken,
}

impl AnalysisPool {
    /// Build a pool sized by `config.pool.worker_threads` (0 = one per core)
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let threads = config.pool.worker_threads;
        let engine = Engine::new(config)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("dialectic-worker-{}", i))
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;
        info!(threads = pool.current_num_threads(), "analysis pool started");
        Ok(Self {
            engine: Arc::new(engine),
            pool,
            token: CancellationToken::new(),
        })
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Token observed by every request this pool runs
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Stop all running and future requests at their next budget check
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Analyze one request on the pool
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        self.pool.install(|| self.engine.analyze_with_token(request, &self.token))
    }

    /// Analyze many requests; reports come back in request order
    pub fn analyze_batch(&self, requests: &[AnalysisRequest]) -> Vec<AnalysisReport> {
        self.pool.install(|| {
            requests
                .par_iter()
                .map(|request| self.engine.analyze_with_token(request, &self.token))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_sizing() {
        let pool = AnalysisPool::new(EngineConfig::new().with_worker_threads(2)).unwrap();
        assert_eq!(pool.threads(), 2);
        assert!(AnalysisPool::new(EngineConfig::new().with_max_steps(0)).is_err());
    }
}
