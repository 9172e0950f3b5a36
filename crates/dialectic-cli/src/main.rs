//! Dialectic CLI entry point
//!
//! Reports are written to stdout as JSON; logs and errors go to stderr.

use std::process;

use clap::{Parser, Subcommand};
use dialectic_cli::{AnalyzeCommand, BatchCommand, CliErrorHandler, CnfCommand};
use dialectic_engine::tracing::init_tracing;

//-----------------------------------------------------------------------------
// Command Definition
//-----------------------------------------------------------------------------

/// Formal verification for argument graphs
#[derive(Debug, Parser)]
#[command(name = "dialectic", version, about = "Find contradictions and structural fallacies in argument graphs")]
struct Cli {
    /// Log filter directives, e.g. "debug" or "dialectic_logic=trace,info"
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Print the full cause chain on errors
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze one request file
    Analyze(AnalyzeCommand),

    /// Analyze several request files in parallel
    Batch(BatchCommand),

    /// Print the clause normal form of a formal expression
    Cnf(CnfCommand),
}

//-----------------------------------------------------------------------------
// Main Function
//-----------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();
    let error_handler = CliErrorHandler::new(cli.verbose, cli.json_logs);

    if let Err(err) = init_tracing(Some(&cli.log_level), cli.json_logs) {
        process::exit(error_handler.handle_error(&err));
    }

    let result = match &cli.command {
        Command::Analyze(command) => command.execute(),
        Command::Batch(command) => command.execute(),
        Command::Cnf(command) => command.execute(),
    };

    if let Err(err) = result {
        process::exit(error_handler.handle_error(&err));
    }
}
