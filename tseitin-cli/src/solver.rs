//! External SAT solver runner.
//!
//! The solver is treated as a black box: it reads a DIMACS file, writes its
//! log to an output file and reports its verdict through the exit code and,
//! depending on the solver, a status line or a result file. Only the verdict
//! is interpreted.

use std::{
    fmt,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use clap::ValueEnum;
use thiserror::Error;
use tracing::{Span, debug, field, info, instrument, warn};

/// Exit code conventionally reported for runs stopped by the timeout.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Supported solver front ends.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum SolverKind {
    /// Kissat: prints an `s ...` status line to stdout.
    #[default]
    Kissat,
    /// MiniSat: writes the verdict as the first line of a result file.
    Minisat,
}

impl SolverKind {
    /// Returns the binary name looked up on `PATH` when no explicit path is
    /// configured.
    #[must_use]
    pub const fn binary_name(self) -> &'static str {
        match self {
            Self::Kissat => "kissat",
            Self::Minisat => "minisat",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// Verdict reported by the solver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverStatus {
    /// A satisfying assignment exists.
    Sat,
    /// No satisfying assignment exists.
    Unsat,
    /// The solver gave up or was stopped by the timeout.
    Unknown,
}

impl SolverStatus {
    /// Returns the conventional upper-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sat => "SAT",
            Self::Unsat => "UNSAT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one solver invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverOutcome {
    /// Classified verdict.
    pub status: SolverStatus,
    /// Normalized exit code; [`TIMEOUT_EXIT_CODE`] for timeouts.
    pub exit_code: Option<i32>,
    /// Wall-clock time from spawn to exit.
    pub runtime: Duration,
    /// File holding the solver's combined stdout and stderr.
    pub output_path: PathBuf,
}

impl SolverOutcome {
    /// Returns `true` when the run was stopped or reported as unknown.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.status == SolverStatus::Unknown && self.exit_code == Some(TIMEOUT_EXIT_CODE)
    }
}

/// Errors raised while running an external solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The output file could not be created.
    #[error("failed to create solver output `{path}`: {source}")]
    Output {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The solver process could not be started.
    #[error("failed to start solver `{program}`: {source}")]
    Spawn {
        /// Program that was invoked.
        program: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Waiting on or stopping the solver failed.
    #[error("failed to supervise solver `{program}`: {source}")]
    Supervise {
        /// Program that was invoked.
        program: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The solver exited with a code that carries no verdict.
    #[error("solver {solver} failed with exit status {exit_code}")]
    Failed {
        /// Solver front end.
        solver: SolverKind,
        /// Normalized exit code.
        exit_code: i32,
    },
}

impl SolverError {
    /// Returns a stable machine-readable code for logs.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Output { .. } => "SOLVER_OUTPUT",
            Self::Spawn { .. } => "SOLVER_SPAWN",
            Self::Supervise { .. } => "SOLVER_SUPERVISE",
            Self::Failed { .. } => "SOLVER_FAILED",
        }
    }
}

/// Runs a solver on a DIMACS file.
pub trait SolverRunner {
    /// Solves `formula`, writing the solver log to `output`.
    ///
    /// # Errors
    /// Returns [`SolverError`] when the solver cannot be run or exits without
    /// a usable verdict.
    fn run(&self, formula: &Path, output: &Path) -> Result<SolverOutcome, SolverError>;
}

/// Runs a solver as a child process with a wall-clock timeout.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use tseitin_cli::solver::{ProcessSolver, SolverKind};
///
/// let solver = ProcessSolver::new(SolverKind::Minisat).with_timeout(Duration::from_secs(5));
/// assert_eq!(solver.program().to_str(), Some("minisat"));
/// ```
#[derive(Clone, Debug)]
pub struct ProcessSolver {
    kind: SolverKind,
    program: PathBuf,
    timeout: Duration,
}

impl ProcessSolver {
    /// Creates a runner that looks the solver up on `PATH`.
    #[must_use]
    pub fn new(kind: SolverKind) -> Self {
        Self {
            kind,
            program: PathBuf::from(kind.binary_name()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Uses an explicit solver binary.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the wall-clock timeout. A zero timeout falls back to the default.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        self
    }

    /// Returns the solver front end.
    #[must_use]
    #[rustfmt::skip]
    pub const fn kind(&self) -> SolverKind { self.kind }

    /// Returns the binary that will be invoked.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the configured timeout.
    #[must_use]
    #[rustfmt::skip]
    pub const fn timeout(&self) -> Duration { self.timeout }

    fn command(&self, formula: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        match self.kind {
            SolverKind::Kissat => {
                command
                    .arg(format!("--time={}", self.timeout.as_secs().max(1)))
                    .arg(formula);
            }
            SolverKind::Minisat => {
                command.arg(formula).arg(minisat_result_path(output));
            }
        }
        command
    }

    fn wait_with_deadline(&self, child: &mut Child) -> Result<Option<ExitStatus>, SolverError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait().map_err(|source| self.supervise(source))? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                warn!(timeout_ms = self.timeout.as_millis(), "solver timed out; stopping it");
                if let Err(source) = child.kill() {
                    // The child may have exited between the poll and the kill.
                    debug!(error = %source, "kill after timeout failed");
                }
                child.wait().map_err(|source| self.supervise(source))?;
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn supervise(&self, source: io::Error) -> SolverError {
        SolverError::Supervise {
            program: self.program.clone(),
            source,
        }
    }
}

impl SolverRunner for ProcessSolver {
    #[instrument(
        name = "solver.run",
        err,
        skip_all,
        fields(solver = %self.kind, formula = %formula.display(), status = field::Empty),
    )]
    fn run(&self, formula: &Path, output: &Path) -> Result<SolverOutcome, SolverError> {
        let log = File::create(output).map_err(|source| SolverError::Output {
            path: output.to_path_buf(),
            source,
        })?;
        let log_for_stderr = log.try_clone().map_err(|source| SolverError::Output {
            path: output.to_path_buf(),
            source,
        })?;

        let started = Instant::now();
        let mut child = self
            .command(formula, output)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_for_stderr))
            .spawn()
            .map_err(|source| SolverError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let exit = self.wait_with_deadline(&mut child)?;
        let runtime = started.elapsed();

        let (status, exit_code) = match exit.map(normalized_exit_code) {
            None => (SolverStatus::Unknown, TIMEOUT_EXIT_CODE),
            Some(code) if is_timeout_exit_code(code) => {
                (SolverStatus::Unknown, TIMEOUT_EXIT_CODE)
            }
            Some(code) => {
                let report = read_report(self.kind, output);
                let status = classify(self.kind, code, report.as_deref())?;
                // Kissat reports `s UNKNOWN` when its own time limit fires.
                let gave_up = self.kind == SolverKind::Kissat
                    && report.as_deref().and_then(kissat_status_line)
                        == Some(SolverStatus::Unknown);
                (status, if gave_up { TIMEOUT_EXIT_CODE } else { code })
            }
        };

        Span::current().record("status", field::display(status));
        info!(
            exit_code,
            runtime_ms = runtime.as_millis(),
            "solver finished"
        );
        Ok(SolverOutcome {
            status,
            exit_code: Some(exit_code),
            runtime,
            output_path: output.to_path_buf(),
        })
    }
}

/// Path of the MiniSat result file that accompanies `output`.
#[must_use]
pub fn minisat_result_path(output: &Path) -> PathBuf {
    let mut path = output.as_os_str().to_owned();
    path.push(".res");
    PathBuf::from(path)
}

fn read_report(kind: SolverKind, output: &Path) -> Option<String> {
    let path = match kind {
        SolverKind::Kissat => output.to_path_buf(),
        SolverKind::Minisat => minisat_result_path(output),
    };
    fs::read_to_string(path).ok()
}

/// Maps an exit status to a shell-style code: the exit code itself, or
/// `128 + signal` for processes killed by a signal.
fn normalized_exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt as _;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

/// Codes produced by `timeout(1)` and by SIGKILL/SIGTERM.
const fn is_timeout_exit_code(code: i32) -> bool {
    matches!(code, TIMEOUT_EXIT_CODE | 137 | 143)
}

/// Classifies a finished run from its exit code and report text.
///
/// For Kissat the report is the solver log and the first `s ` line decides;
/// for MiniSat the report is the result file and its first line decides.
/// Without a verdict in the report, exit codes 10 and 20 mean SAT and UNSAT.
///
/// # Errors
/// Returns [`SolverError::Failed`] when no verdict is found and the exit code
/// is neither zero nor a verdict code.
pub fn classify(
    kind: SolverKind,
    exit_code: i32,
    report: Option<&str>,
) -> Result<SolverStatus, SolverError> {
    let reported = report.and_then(|text| match kind {
        SolverKind::Kissat => kissat_status_line(text),
        SolverKind::Minisat => minisat_verdict(text),
    });

    if let Some(status) = reported {
        if kind == SolverKind::Kissat && !matches!(exit_code, 0 | 10 | 20) {
            return Err(SolverError::Failed {
                solver: kind,
                exit_code,
            });
        }
        return Ok(status);
    }

    match exit_code {
        10 => Ok(SolverStatus::Sat),
        20 => Ok(SolverStatus::Unsat),
        0 => Ok(SolverStatus::Unknown),
        _ => Err(SolverError::Failed {
            solver: kind,
            exit_code,
        }),
    }
}

fn kissat_status_line(log: &str) -> Option<SolverStatus> {
    let line = log.lines().find(|line| line.starts_with("s "))?;
    let line = line.to_ascii_lowercase();
    if line.contains("unknown") {
        Some(SolverStatus::Unknown)
    } else if line.contains("unsat") {
        Some(SolverStatus::Unsat)
    } else if line.contains("sat") {
        Some(SolverStatus::Sat)
    } else {
        None
    }
}

fn minisat_verdict(result: &str) -> Option<SolverStatus> {
    let first = result.lines().next()?.trim().to_ascii_lowercase();
    match first.as_str() {
        "sat" | "satisfiable" => Some(SolverStatus::Sat),
        "unsat" | "unsatisfiable" => Some(SolverStatus::Unsat),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::kissat_sat_line(SolverKind::Kissat, 10, Some("c banner\ns SATISFIABLE\nv 1 0\n"), SolverStatus::Sat)]
    #[case::kissat_unsat_line(SolverKind::Kissat, 20, Some("s UNSATISFIABLE\n"), SolverStatus::Unsat)]
    #[case::kissat_unknown_line(SolverKind::Kissat, 0, Some("s UNKNOWN\n"), SolverStatus::Unknown)]
    #[case::kissat_exit_only(SolverKind::Kissat, 20, Some("c no status\n"), SolverStatus::Unsat)]
    #[case::kissat_missing_log(SolverKind::Kissat, 10, None, SolverStatus::Sat)]
    #[case::kissat_silent_success(SolverKind::Kissat, 0, Some(""), SolverStatus::Unknown)]
    #[case::minisat_unsat(SolverKind::Minisat, 20, Some("UNSAT\n"), SolverStatus::Unsat)]
    #[case::minisat_sat_words(SolverKind::Minisat, 10, Some(" satisfiable \n1 -2 0\n"), SolverStatus::Sat)]
    #[case::minisat_verdict_wins(SolverKind::Minisat, 3, Some("SAT\n"), SolverStatus::Sat)]
    #[case::minisat_exit_only(SolverKind::Minisat, 20, Some("INDET\n"), SolverStatus::Unsat)]
    fn classifies_reported_verdicts(
        #[case] kind: SolverKind,
        #[case] exit_code: i32,
        #[case] report: Option<&str>,
        #[case] expected: SolverStatus,
    ) {
        let status = classify(kind, exit_code, report).expect("verdict must classify");
        assert_eq!(status, expected);
    }

    #[rstest]
    #[case::kissat_crash(SolverKind::Kissat, 1, Some("s SATISFIABLE\n"))]
    #[case::kissat_no_verdict(SolverKind::Kissat, 2, Some("c parse error\n"))]
    #[case::minisat_no_verdict(SolverKind::Minisat, 3, None)]
    fn unexplained_exit_codes_fail(
        #[case] kind: SolverKind,
        #[case] exit_code: i32,
        #[case] report: Option<&str>,
    ) {
        let err = classify(kind, exit_code, report).expect_err("run must fail");
        assert!(matches!(err, SolverError::Failed { solver, exit_code: code } if solver == kind && code == exit_code));
        assert_eq!(err.code(), "SOLVER_FAILED");
    }

    #[rstest]
    #[case(124, true)]
    #[case(137, true)]
    #[case(143, true)]
    #[case(20, false)]
    fn recognises_timeout_exit_codes(#[case] code: i32, #[case] expected: bool) {
        assert_eq!(is_timeout_exit_code(code), expected);
    }

    #[test]
    fn minisat_result_sits_next_to_output() {
        assert_eq!(
            minisat_result_path(Path::new("/tmp/run.out")),
            PathBuf::from("/tmp/run.out.res")
        );
    }

    #[test]
    fn zero_timeout_uses_default() {
        let solver = ProcessSolver::new(SolverKind::Kissat).with_timeout(Duration::ZERO);
        assert_eq!(solver.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn kissat_command_passes_time_limit() {
        let solver = ProcessSolver::new(SolverKind::Kissat)
            .with_program("/opt/kissat")
            .with_timeout(Duration::from_secs(7));
        let command = solver.command(Path::new("in.cnf"), Path::new("out.txt"));
        assert_eq!(command.get_program(), "/opt/kissat");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["--time=7", "in.cnf"]);
    }

    #[test]
    fn minisat_command_names_result_file() {
        let solver = ProcessSolver::new(SolverKind::Minisat);
        let command = solver.command(Path::new("in.cnf"), Path::new("out.txt"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["in.cnf", "out.txt.res"]);
    }

    #[cfg(unix)]
    mod process {
        use super::*;

        use std::os::unix::fs::PermissionsExt as _;

        use tempfile::TempDir;

        fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
            let path = dir.path().join(name);
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("script is writable");
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("script is executable");
            path
        }

        fn formula(dir: &TempDir) -> PathBuf {
            let path = dir.path().join("instance.cnf");
            fs::write(&path, "p cnf 1 2\n1 0\n-1 0\n").expect("formula is writable");
            path
        }

        #[test]
        fn kissat_verdict_is_read_from_log() {
            let dir = tempfile::tempdir().expect("tempdir");
            let program = script(&dir, "fake-kissat", "echo 'c fake'\necho 's UNSATISFIABLE'\nexit 20");
            let output = dir.path().join("instance.out");
            let outcome = ProcessSolver::new(SolverKind::Kissat)
                .with_program(&program)
                .run(&formula(&dir), &output)
                .expect("fake solver runs");

            assert_eq!(outcome.status, SolverStatus::Unsat);
            assert_eq!(outcome.exit_code, Some(20));
            assert_eq!(outcome.output_path, output);
            assert!(!outcome.timed_out());
            let log = fs::read_to_string(&output).expect("log is readable");
            assert!(log.contains("s UNSATISFIABLE"));
        }

        #[test]
        fn minisat_verdict_is_read_from_result_file() {
            let dir = tempfile::tempdir().expect("tempdir");
            let program = script(&dir, "fake-minisat", "echo SAT > \"$2\"\nexit 10");
            let output = dir.path().join("instance.out");
            let outcome = ProcessSolver::new(SolverKind::Minisat)
                .with_program(&program)
                .run(&formula(&dir), &output)
                .expect("fake solver runs");
            assert_eq!(outcome.status, SolverStatus::Sat);
            assert_eq!(outcome.exit_code, Some(10));
        }

        #[test]
        fn slow_solver_is_stopped() {
            let dir = tempfile::tempdir().expect("tempdir");
            let program = script(&dir, "slow-kissat", "exec sleep 30");
            let outcome = ProcessSolver::new(SolverKind::Kissat)
                .with_program(&program)
                .with_timeout(Duration::from_millis(200))
                .run(&formula(&dir), &dir.path().join("slow.out"))
                .expect("timeouts are not errors");
            assert_eq!(outcome.status, SolverStatus::Unknown);
            assert_eq!(outcome.exit_code, Some(TIMEOUT_EXIT_CODE));
            assert!(outcome.timed_out());
            assert!(outcome.runtime < Duration::from_secs(10));
        }

        #[test]
        fn crashing_solver_is_an_error() {
            let dir = tempfile::tempdir().expect("tempdir");
            let program = script(&dir, "broken-kissat", "echo 'c boom' >&2\nexit 1");
            let err = ProcessSolver::new(SolverKind::Kissat)
                .with_program(&program)
                .run(&formula(&dir), &dir.path().join("broken.out"))
                .expect_err("exit 1 has no verdict");
            assert!(matches!(err, SolverError::Failed { exit_code: 1, .. }));
        }

        #[test]
        fn missing_binary_is_a_spawn_error() {
            let dir = tempfile::tempdir().expect("tempdir");
            let err = ProcessSolver::new(SolverKind::Kissat)
                .with_program(dir.path().join("does-not-exist"))
                .run(&formula(&dir), &dir.path().join("missing.out"))
                .expect_err("binary is missing");
            assert!(matches!(err, SolverError::Spawn { .. }));
            assert_eq!(err.code(), "SOLVER_SPAWN");
        }
    }
}
