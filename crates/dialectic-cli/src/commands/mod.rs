//! CLI subcommands and the helpers they share

pub mod analyze;
pub mod batch;
pub mod cnf;

pub use analyze::AnalyzeCommand;
pub use batch::BatchCommand;
pub use cnf::CnfCommand;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dialectic_engine::EngineConfig;
use dialectic_types::AnalysisRequest;
use serde::Serialize;

/// Load the engine configuration, or the defaults when no file is given
pub(crate) fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Read one JSON analysis request
pub(crate) fn read_request(path: &Path) -> Result<AnalysisRequest> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read request file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid request JSON in {}", path.display()))
}

pub(crate) fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
