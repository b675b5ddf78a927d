//! Command implementations and argument parsing for the `tseitin` CLI.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::{SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};
use tseitin_core::{
    ChargeParity, EncodeError, GraphError, GraphMode, charge_parity, derive_seed, encode,
    generate, predict_satisfiable, random_charges, single_charge, write_dimacs_file,
};

use crate::solver::{ProcessSolver, SolverError, SolverKind, SolverOutcome, SolverRunner};

const DEFAULT_REWIRE_PROBABILITY: f64 = 0.1;
const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "tseitin",
    about = "Generate Tseitin parity formulas over random regular graphs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate one instance and write it as DIMACS.
    Generate(GenerateCommand),
    /// Generate one instance and run an external solver on it.
    Solve(SolveCommand),
}

/// Options describing one instance.
#[derive(Debug, Args, Clone)]
pub struct InstanceArgs {
    /// Number of vertices.
    #[arg(long)]
    pub vertices: usize,

    /// Degree of every vertex.
    #[arg(long)]
    pub degree: usize,

    /// Graph model.
    #[arg(long, value_enum, default_value_t = ModeArg::Circulant)]
    pub mode: ModeArg,

    /// Rewiring probability for `watts-strogatz`.
    #[arg(long = "rewire-probability", default_value_t = DEFAULT_REWIRE_PROBABILITY)]
    pub rewire_probability: f64,

    /// Keep the circulant lattice's natural vertex labels.
    #[arg(long = "no-relabel")]
    pub no_relabel: bool,

    /// Base seed; a fresh one is drawn and reported when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Trial index mixed into the instance seed.
    #[arg(long, default_value_t = 0)]
    pub trial: u64,

    /// Charge assignment.
    #[arg(long, value_enum, default_value_t = ChargeArg::Odd)]
    pub charges: ChargeArg,

    /// Vertex carrying the charge for `--charges single`.
    #[arg(long = "charged-vertex", default_value_t = 0)]
    pub charged_vertex: usize,

    /// Destination of the DIMACS file.
    #[arg(long)]
    pub output: PathBuf,
}

impl InstanceArgs {
    /// Returns the generator mode selected by the flags.
    #[must_use]
    pub const fn graph_mode(&self) -> GraphMode {
        match self.mode {
            ModeArg::Circulant => GraphMode::Circulant {
                relabel: !self.no_relabel,
            },
            ModeArg::ConfigModel => GraphMode::ConfigurationModel,
            ModeArg::WattsStrogatz => GraphMode::WattsStrogatz {
                rewire_probability: self.rewire_probability,
            },
        }
    }
}

/// Graph models selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Ring lattice, optionally relabeled.
    Circulant,
    /// Random stub pairing with whole-attempt rejection.
    ConfigModel,
    /// Relabeled lattice with degree-preserving swaps.
    WattsStrogatz,
}

/// Charge assignments selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChargeArg {
    /// Random charges with an odd total (unsatisfiable on connected graphs).
    Odd,
    /// Random charges with an even total.
    Even,
    /// No charges.
    Zero,
    /// A single charged vertex, chosen by `--charged-vertex`.
    Single,
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Instance description.
    #[command(flatten)]
    pub instance: InstanceArgs,
}

/// Options accepted by the `solve` command.
#[derive(Debug, Args, Clone)]
pub struct SolveCommand {
    /// Instance description.
    #[command(flatten)]
    pub instance: InstanceArgs,

    /// Solver front end.
    #[arg(long, value_enum, default_value_t = SolverKind::Kissat)]
    pub solver: SolverKind,

    /// Explicit solver binary; defaults to the front end's name on `PATH`.
    #[arg(long = "solver-path")]
    pub solver_path: Option<PathBuf>,

    /// Wall-clock limit for the solver.
    #[arg(long = "timeout-seconds", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Destination of the solver log; defaults to the DIMACS path with an
    /// `.out` extension.
    #[arg(long = "solver-output")]
    pub solver_output: Option<PathBuf>,
}

impl SolveCommand {
    /// Builds the process runner described by the flags.
    #[must_use]
    pub fn runner(&self) -> ProcessSolver {
        let solver = ProcessSolver::new(self.solver)
            .with_timeout(Duration::from_secs(self.timeout_seconds));
        match &self.solver_path {
            Some(path) => solver.with_program(path),
            None => solver,
        }
    }

    /// Returns where the solver log is written.
    #[must_use]
    pub fn solver_output_path(&self) -> PathBuf {
        self.solver_output
            .clone()
            .unwrap_or_else(|| self.instance.output.with_extension("out"))
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing the DIMACS file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Graph generation failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Charge construction or encoding failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// The external solver failed.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl CliError {
    /// Returns the stable code of the underlying failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CLI_IO",
            Self::Graph(err) => err.code().as_str(),
            Self::Encode(err) => err.code().as_str(),
            Self::Solver(err) => err.code(),
        }
    }
}

/// Description of a generated instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceSummary {
    /// Number of vertices.
    pub vertices: usize,
    /// Common degree.
    pub degree: usize,
    /// Generator mode.
    pub mode: GraphMode,
    /// Base seed, as given or freshly drawn.
    pub base_seed: u64,
    /// Trial index.
    pub trial: u64,
    /// Seed actually fed to the generator.
    pub seed: u64,
    /// Parity of the charge vector.
    pub charge_parity: ChargeParity,
    /// Number of CNF variables.
    pub variables: usize,
    /// Number of CNF clauses.
    pub clauses: usize,
    /// Satisfiability predicted from component charge parities.
    pub satisfiable: bool,
    /// Where the DIMACS file was written.
    pub output: PathBuf,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// The generated instance.
    pub instance: InstanceSummary,
    /// Solver outcome for `solve`; `None` for `generate`.
    pub solver: Option<SolverOutcome>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when generation, encoding, file output or the solver
/// fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use tseitin_cli::cli::{ChargeArg, Cli, Command, GenerateCommand, InstanceArgs, ModeArg, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         instance: InstanceArgs {
///             vertices: 8,
///             degree: 3,
///             mode: ModeArg::Circulant,
///             rewire_probability: 0.1,
///             no_relabel: true,
///             seed: Some(1),
///             trial: 0,
///             charges: ChargeArg::Odd,
///             charged_vertex: 0,
///             output: dir.path().join("cubic.cnf"),
///         },
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.instance.variables, 28);
/// assert!(!summary.instance.satisfiable);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Generate(command) => {
            span.record("command", field::display("generate"));
            run_generate(&command)
        }
        Command::Solve(command) => {
            span.record("command", field::display("solve"));
            let runner = command.runner();
            run_solve(&command, &runner)
        }
    }
}

pub(super) fn run_generate(command: &GenerateCommand) -> Result<ExecutionSummary, CliError> {
    let instance = build_instance(&command.instance)?;
    Ok(ExecutionSummary {
        instance,
        solver: None,
    })
}

#[instrument(
    name = "cli.solve",
    err,
    skip_all,
    fields(solver = %command.solver, solver_output = field::Empty),
)]
pub(super) fn run_solve(
    command: &SolveCommand,
    runner: &dyn SolverRunner,
) -> Result<ExecutionSummary, CliError> {
    let instance = build_instance(&command.instance)?;
    let solver_output = command.solver_output_path();
    Span::current().record("solver_output", field::display(solver_output.display()));
    ensure_parent_dir(&solver_output)?;

    let outcome = runner.run(&instance.output, &solver_output)?;
    let expected = if instance.satisfiable { "SAT" } else { "UNSAT" };
    info!(
        status = %outcome.status,
        expected,
        runtime_ms = outcome.runtime.as_millis(),
        "solve completed"
    );
    Ok(ExecutionSummary {
        instance,
        solver: Some(outcome),
    })
}

#[instrument(
    name = "cli.instance",
    err,
    skip_all,
    fields(
        vertices = args.vertices,
        degree = args.degree,
        trial = args.trial,
        base_seed = field::Empty,
        seed = field::Empty,
    ),
)]
pub(super) fn build_instance(args: &InstanceArgs) -> Result<InstanceSummary, CliError> {
    let base_seed = args.seed.unwrap_or_else(rand::random);
    let seed = derive_seed(base_seed, args.vertices, args.degree, args.trial);
    let span = Span::current();
    span.record("base_seed", base_seed);
    span.record("seed", seed);

    let mode = args.graph_mode();
    let mut rng = SmallRng::seed_from_u64(seed);
    let graph = generate(args.vertices, args.degree, mode, &mut rng)?;
    let charges = match args.charges {
        ChargeArg::Odd => random_charges(args.vertices, ChargeParity::Odd, &mut rng),
        ChargeArg::Even => random_charges(args.vertices, ChargeParity::Even, &mut rng),
        ChargeArg::Zero => vec![false; args.vertices],
        ChargeArg::Single => single_charge(args.vertices, args.charged_vertex)?,
    };
    let formula = encode(&graph, &charges)?;
    let satisfiable = predict_satisfiable(&graph, &charges)?;

    ensure_parent_dir(&args.output)?;
    write_dimacs_file(&formula, &args.output).map_err(|source| CliError::Io {
        path: args.output.clone(),
        source,
    })?;

    info!(
        path = %args.output.display(),
        variables = formula.variable_count(),
        clauses = formula.clause_count(),
        satisfiable,
        "instance written"
    );
    Ok(InstanceSummary {
        vertices: args.vertices,
        degree: args.degree,
        mode,
        base_seed,
        trial: args.trial,
        seed,
        charge_parity: charge_parity(&charges),
        variables: formula.variable_count(),
        clauses: formula.clause_count(),
        satisfiable,
        output: args.output.clone(),
    })
}

fn ensure_parent_dir(path: &Path) -> Result<(), CliError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| CliError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Renders `summary` to `writer` as `key: value` lines.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::path::PathBuf;
/// # use tseitin_cli::cli::{ExecutionSummary, InstanceSummary, render_summary};
/// # use tseitin_core::{ChargeParity, GraphMode};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     instance: InstanceSummary {
///         vertices: 6,
///         degree: 2,
///         mode: GraphMode::ConfigurationModel,
///         base_seed: 1,
///         trial: 0,
///         seed: 2,
///         charge_parity: ChargeParity::Even,
///         variables: 12,
///         clauses: 30,
///         satisfiable: true,
///         output: PathBuf::from("cycle.cnf"),
///     },
///     solver: None,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.contains("expected: SAT\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let instance = &summary.instance;
    writeln!(writer, "vertices: {}", instance.vertices)?;
    writeln!(writer, "degree: {}", instance.degree)?;
    writeln!(writer, "mode: {}", instance.mode)?;
    writeln!(writer, "base_seed: {}", instance.base_seed)?;
    writeln!(writer, "trial: {}", instance.trial)?;
    writeln!(writer, "seed: {}", instance.seed)?;
    writeln!(writer, "charges: {}", instance.charge_parity)?;
    writeln!(writer, "variables: {}", instance.variables)?;
    writeln!(writer, "clauses: {}", instance.clauses)?;
    writeln!(
        writer,
        "expected: {}",
        if instance.satisfiable { "SAT" } else { "UNSAT" }
    )?;
    writeln!(writer, "cnf: {}", instance.output.display())?;

    if let Some(outcome) = &summary.solver {
        writeln!(writer, "status: {}", outcome.status)?;
        match outcome.exit_code {
            Some(code) => writeln!(writer, "exit_code: {code}")?,
            None => writeln!(writer, "exit_code: none")?,
        }
        writeln!(writer, "runtime_ms: {}", outcome.runtime.as_millis())?;
        writeln!(writer, "solver_output: {}", outcome.output_path.display())?;
    }
    Ok(())
}
