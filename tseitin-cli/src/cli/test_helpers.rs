//! Small helpers shared across CLI tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;

use crate::solver::{SolverError, SolverOutcome, SolverRunner, SolverStatus};

use super::{ChargeArg, Cli, CliError, InstanceArgs, ModeArg, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// A seeded cubic instance on eight vertices written under `dir`.
pub(super) fn cubic_instance(dir: &TempDir, name: &str) -> InstanceArgs {
    InstanceArgs {
        vertices: 8,
        degree: 3,
        mode: ModeArg::ConfigModel,
        rewire_probability: 0.1,
        no_relabel: false,
        seed: Some(7),
        trial: 0,
        charges: ChargeArg::Odd,
        charged_vertex: 0,
        output: dir.path().join(name),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

/// Solver double that records its inputs and reports a fixed verdict.
pub(super) struct ScriptedSolver {
    status: SolverStatus,
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl ScriptedSolver {
    pub(super) fn reporting(status: SolverStatus) -> Self {
        Self {
            status,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl SolverRunner for ScriptedSolver {
    fn run(&self, formula: &Path, output: &Path) -> Result<SolverOutcome, SolverError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((formula.to_path_buf(), output.to_path_buf()));
        let exit_code = match self.status {
            SolverStatus::Sat => 10,
            SolverStatus::Unsat => 20,
            SolverStatus::Unknown => 124,
        };
        Ok(SolverOutcome {
            status: self.status,
            exit_code: Some(exit_code),
            runtime: Duration::from_millis(3),
            output_path: output.to_path_buf(),
        })
    }
}
