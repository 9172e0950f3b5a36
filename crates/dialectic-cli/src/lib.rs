//! Dialectic CLI Library
//!
//! Command implementations behind the `dialectic` binary. Each command
//! returns its JSON output from `run` so it can be used without a process.

pub mod commands;
pub mod error;

pub use commands::*;
pub use error::*;
