//! CLI error reporting
//!
//! Failures go to stderr, either as plain text (with the cause chain when
//! verbose) or as one JSON object, and map to a process exit code.

use serde_json::{json, Value};

/// Exit code for any failed command
pub const EXIT_FAILURE: i32 = 1;

/// Shared error handler for command line operations
#[derive(Debug, Clone, Copy)]
pub struct CliErrorHandler {
    pub verbose: bool,
    pub json: bool,
}

impl CliErrorHandler {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Structured form of an error and its causes
    pub fn describe(&self, error: &anyhow::Error) -> Value {
        let causes: Vec<String> = error.chain().skip(1).map(|cause| cause.to_string()).collect();
        json!({
            "error": error.to_string(),
            "causes": causes,
        })
    }

    /// Print the error and return the exit code to use
    pub fn handle_error(&self, error: &anyhow::Error) -> i32 {
        if self.json {
            eprintln!("{}", self.describe(error));
        } else {
            eprintln!("Error: {}", error);
            if self.verbose {
                for cause in error.chain().skip(1) {
                    eprintln!("Caused by: {}", cause);
                }
            }
        }
        EXIT_FAILURE
    }
}
