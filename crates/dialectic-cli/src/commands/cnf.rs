//! Cnf command: show how one formal expression is parsed and normalised.

use anyhow::{Context, Result};
use clap::Parser;
use dialectic_logic::cnf::to_cnf;
use dialectic_logic::{parse, VarTable};
use serde::Serialize;

use super::to_json;

#[derive(Parser, Debug, Clone)]
pub struct CnfCommand {
    /// Formal expression, e.g. "a ∧ (b → c)"
    pub expression: String,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CnfOutput {
    /// The expression as parsed, fully normalised
    pub parsed: String,
    pub atoms: Vec<String>,
    pub clauses: Vec<String>,
}

impl CnfCommand {
    pub fn convert(&self) -> Result<CnfOutput> {
        let expr = parse(&self.expression)
            .with_context(|| format!("Cannot parse expression {:?}", self.expression))?;
        let mut vars = VarTable::new();
        let clauses = to_cnf(&expr, &mut vars)?;
        Ok(CnfOutput {
            parsed: expr.to_string(),
            atoms: expr.atoms().into_iter().map(str::to_string).collect(),
            clauses: clauses.iter().map(|c| c.display(&vars).to_string()).collect(),
        })
    }

    pub fn run(&self) -> Result<String> {
        to_json(&self.convert()?, self.pretty)
    }

    pub fn execute(&self) -> Result<()> {
        println!("{}", self.run()?);
        Ok(())
    }
}
