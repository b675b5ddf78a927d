//! `tseitin`: writes Tseitin parity benchmarks for SAT solvers.
//!
//! `tseitin generate` builds a d-regular graph, charges its vertices and
//! writes the parity formula as a DIMACS file. `tseitin solve` does the same
//! and then hands the file to kissat or minisat under a wall-clock limit.
//!
//! The run summary goes to stdout as `key: value` lines. Diagnostics go to
//! stderr, filtered by `RUST_LOG` and formatted per `TSEITIN_LOG_FORMAT`.
//! Any failure is logged with its stable error code and exits non-zero.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use tracing::{error, field};
use tseitin_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};

fn try_main() -> Result<()> {
    let summary = run_cli(Cli::parse()).context("tseitin command failed")?;
    let mut stdout = BufWriter::new(io::stdout().lock());
    render_summary(&summary, &mut stdout).context("failed to print the run summary")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

fn report_failure(err: &anyhow::Error) {
    let code = err.downcast_ref::<CliError>().map(CliError::code);
    error!(
        error = %err,
        code = code.map(field::display),
        "tseitin run failed"
    );
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "logging is not available when its own setup fails"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("tseitin: cannot set up logging: {err}");
}
