// Engine-specific error types
// These errors are specifically for the analysis engine and its configuration

use thiserror::Error;
use crate::{DialecticError, ErrorCode, ErrorDomain};

/// Engine-specific error codes
pub mod codes {
    use crate::ErrorCode;

    // Engine error codes start with 5000
    pub const SOLVER_TIMEOUT: ErrorCode = ErrorCode(5001);
    pub const CYCLE_BUDGET_EXHAUSTED: ErrorCode = ErrorCode(5002);
    pub const CANCELLED: ErrorCode = ErrorCode(5003);
    pub const INVALID_CONFIG: ErrorCode = ErrorCode(5004);
    pub const CONFIG_IO: ErrorCode = ErrorCode(5005);
    pub const CONFIG_PARSE: ErrorCode = ErrorCode(5006);
    pub const THREAD_POOL: ErrorCode = ErrorCode(5007);
}

/// Engine-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The SAT engine ran out of steps or wall-clock time
    #[error("Solver budget exhausted: {0}")]
    SolverTimeout(String),

    /// Cycle enumeration hit its length, count or time bound
    #[error("Cycle enumeration budget exhausted: {0}")]
    CycleBudgetExhausted(String),

    /// The caller cancelled the request
    #[error("Analysis cancelled")]
    Cancelled,

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read
    #[error("Configuration I/O error: {0}")]
    ConfigIo(String),

    /// The configuration file is not valid TOML for the schema
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    /// The worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl DialecticError for EngineError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            EngineError::SolverTimeout(_) => SOLVER_TIMEOUT,
            EngineError::CycleBudgetExhausted(_) => CYCLE_BUDGET_EXHAUSTED,
            EngineError::Cancelled => CANCELLED,
            EngineError::InvalidConfig(_) => INVALID_CONFIG,
            EngineError::ConfigIo(_) => CONFIG_IO,
            EngineError::ConfigParse(_) => CONFIG_PARSE,
            EngineError::ThreadPool(_) => THREAD_POOL,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Engine
    }

    fn code_name(&self) -> &'static str {
        match self {
            EngineError::SolverTimeout(_) => "ENGINE_SOLVER_TIMEOUT",
            EngineError::CycleBudgetExhausted(_) => "ENGINE_CYCLE_BUDGET_EXHAUSTED",
            EngineError::Cancelled => "ENGINE_CANCELLED",
            EngineError::InvalidConfig(_) => "ENGINE_INVALID_CONFIG",
            EngineError::ConfigIo(_) => "ENGINE_CONFIG_IO",
            EngineError::ConfigParse(_) => "ENGINE_CONFIG_PARSE",
            EngineError::ThreadPool(_) => "ENGINE_THREAD_POOL",
        }
    }
}

/// Convenient Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

// Helper methods for creating engine errors
impl EngineError {
    /// Create a new invalid-configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        EngineError::InvalidConfig(message.into())
    }
}
