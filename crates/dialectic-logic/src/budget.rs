// Search budgets
// A step limit, a wall-clock deadline and a shared cancellation flag.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Cooperative cancellation flag shared across threads
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a bounded search stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exhaustion {
    StepLimit,
    Deadline,
    Cancelled,
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exhaustion::StepLimit => write!(f, "step limit reached"),
            Exhaustion::Deadline => write!(f, "time limit reached"),
            Exhaustion::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Limits for one half of an analysis.
///
/// Steps are counted across every search charged to the same budget.
#[derive(Debug)]
pub struct Budget {
    max_steps: u64,
    steps: AtomicU64,
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl Budget {
    pub fn new(max_steps: u64, time_limit: Option<Duration>, token: CancellationToken) -> Self {
        Self {
            max_steps,
            steps: AtomicU64::new(0),
            deadline: time_limit.map(|limit| Instant::now() + limit),
            token,
        }
    }

    /// No step or time limit; still honours the token
    pub fn unlimited(token: CancellationToken) -> Self {
        Self::new(u64::MAX, None, token)
    }

    /// Charge one step, then check every limit
    pub fn spend(&self) -> Result<(), Exhaustion> {
        let used = self.steps.fetch_add(1, Ordering::Relaxed) + 1;
        if used > self.max_steps {
            return Err(Exhaustion::StepLimit);
        }
        self.check()
    }

    /// Check the deadline and the cancellation flag without charging a step
    pub fn check(&self) -> Result<(), Exhaustion> {
        if self.token.is_cancelled() {
            return Err(Exhaustion::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Exhaustion::Deadline),
            _ => Ok(()),
        }
    }

    pub fn steps_used(&self) -> u64 {
        self.steps.load(Ordering::Relaxed)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::unlimited(CancellationToken::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_limit() {
        let budget = Budget::new(2, None, CancellationToken::new());
        assert!(budget.spend().is_ok());
        assert!(budget.spend().is_ok());
        assert_eq!(budget.spend(), Err(Exhaustion::StepLimit));
        assert_eq!(budget.steps_used(), 3);
    }

    #[test]
    fn test_cancellation_is_shared() {
        let token = CancellationToken::new();
        let budget = Budget::unlimited(token.clone());
        assert!(budget.check().is_ok());
        token.cancel();
        assert_eq!(budget.check(), Err(Exhaustion::Cancelled));
    }

    #[test]
    fn test_elapsed_deadline() {
        let budget = Budget::new(10, Some(Duration::ZERO), CancellationToken::new());
        assert_eq!(budget.spend(), Err(Exhaustion::Deadline));
    }
}
