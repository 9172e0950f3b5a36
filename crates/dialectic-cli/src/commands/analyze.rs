//! Analyze command: one request file in, one JSON report out.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dialectic_engine::Engine;
use tracing::info;

use super::{load_config, read_request, to_json};

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeCommand {
    /// JSON file holding an analysis request
    pub file: PathBuf,

    /// TOML engine configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the report
    #[arg(long)]
    pub pretty: bool,
}

impl AnalyzeCommand {
    /// Run the analysis and return the serialized report
    pub fn run(&self) -> Result<String> {
        let config = load_config(self.config.as_deref())?;
        let engine = Engine::new(config)?;
        let request = read_request(&self.file)?;
        info!(file = %self.file.display(), "analyzing request");
        let report = engine.analyze(&request);
        to_json(&report, self.pretty)
    }

    pub fn execute(&self) -> Result<()> {
        println!("{}", self.run()?);
        Ok(())
    }
}
