//! Command-line interface orchestration for `tseitin`.
//!
//! `generate` builds one instance and writes it as DIMACS; `solve` does the
//! same and then hands the file to an external solver.

mod commands;

pub use commands::{
    ChargeArg, Cli, CliError, Command, ExecutionSummary, GenerateCommand, InstanceArgs,
    InstanceSummary, ModeArg, SolveCommand, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
