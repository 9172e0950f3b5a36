//! Batch command: many request files analysed on the worker pool.

use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;
use dialectic_engine::AnalysisPool;
use dialectic_types::AnalysisReport;
use serde::Serialize;
use tracing::info;

use super::{load_config, read_request, to_json};

#[derive(Parser, Debug, Clone)]
pub struct BatchCommand {
    /// JSON request files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// TOML engine configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Worker threads; overrides the configuration (0 = one per core)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Pretty-print the reports
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Serialize)]
struct BatchEntry<'a> {
    file: String,
    report: &'a AnalysisReport,
}

impl BatchCommand {
    /// Analyze every file and return a JSON array of `{file, report}` in
    /// argument order
    pub fn run(&self) -> Result<String> {
        ensure!(!self.files.is_empty(), "No request files given");
        let mut config = load_config(self.config.as_deref())?;
        if let Some(threads) = self.threads {
            config = config.with_worker_threads(threads);
        }
        let requests = self
            .files
            .iter()
            .map(|path| read_request(path))
            .collect::<Result<Vec<_>>>()?;

        let pool = AnalysisPool::new(config)?;
        info!(requests = requests.len(), threads = pool.threads(), "running batch");
        let reports = pool.analyze_batch(&requests);

        let entries: Vec<BatchEntry<'_>> = self
            .files
            .iter()
            .zip(&reports)
            .map(|(file, report)| BatchEntry {
                file: file.display().to_string(),
                report,
            })
            .collect();
        to_json(&entries, self.pretty)
    }

    pub fn execute(&self) -> Result<()> {
        println!("{}", self.run()?);
        Ok(())
    }
}
