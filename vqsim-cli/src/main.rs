//! `vqsim`: the CLI front-end. A `clap` derive structure with
//! `run`/`validate`/`bench` subcommands that load a circuit file,
//! validate it, simulate it, and render the grid and results as ASCII.

mod cli;
mod scenarios;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::Level;

use cli::GridRenderer;
use vqsim_core::{random::SeededSource, random::ThreadRngSource, simulate, validator, RandomSource};
use vqsim_format::load_circuit_file;

#[derive(Parser)]
#[command(name = "vqsim", version, about = "Grid-based quantum circuit simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Force a deterministic measurement source.
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Load, validate, simulate, and print a circuit file's results.
    Run { file: PathBuf },
    /// Load and validate a circuit file without simulating it.
    Validate { file: PathBuf },
    /// Run one of the built-in scenario circuits and print timing.
    Bench { scenario: String },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn make_rng(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededSource::new(seed)),
        None => Box::new(ThreadRngSource),
    }
}

fn run(file: PathBuf, seed: Option<u64>) -> ExitCode {
    let circuit_file = match load_circuit_file(&file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load {}: {e}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let grid = match circuit_file.to_grid() {
        Ok(g) => g,
        Err(e) => {
            eprintln!("failed to resolve circuit: {e}");
            return ExitCode::FAILURE;
        }
    };

    let structural_errors = validator::validate(&grid);
    for err in &structural_errors {
        println!(
            "structural error: col {} row {} ({:?}): {}",
            err.column, err.row, err.gate_type, err.message
        );
    }

    println!("{}", GridRenderer::new(&grid));

    let mut rng = make_rng(seed);
    let result = match simulate(&grid, rng.as_mut()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("simulation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("final state ({} populated qubit(s)):", result.populated_rows.len());
    for (i, amp) in result.final_state.iter().enumerate() {
        if amp.norm2() > 1e-12 {
            println!("  |{i:0width$b}>: {amp:?}", width = result.populated_rows.len().max(1));
        }
    }

    for row in &result.populated_rows {
        let num_qubits = result.populated_rows.len();
        let filtered = result.populated_rows.iter().position(|r| r == row).unwrap();
        let bloch = vqsim_core::bloch_vector(&result.final_state, filtered, num_qubits);
        println!("  qubit {row} bloch vector: x={:.4} y={:.4} z={:.4}", bloch.x, bloch.y, bloch.z);
    }

    for m in &result.measurements {
        println!("  measured qubit {} = {} (p={:.4})", m.qubit, m.result, m.probability);
    }

    for w in &result.warnings {
        println!(
            "warning: col {} row {} ({:?}): {}",
            w.column, w.row, w.gate_type, w.message
        );
    }

    ExitCode::SUCCESS
}

fn validate(file: PathBuf) -> ExitCode {
    let circuit_file = match load_circuit_file(&file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load {}: {e}", file.display());
            return ExitCode::FAILURE;
        }
    };
    let grid = match circuit_file.to_grid() {
        Ok(g) => g,
        Err(e) => {
            eprintln!("failed to resolve circuit: {e}");
            return ExitCode::FAILURE;
        }
    };
    let errors = validator::validate(&grid);
    if errors.is_empty() {
        println!("ok: no structural errors");
        ExitCode::SUCCESS
    } else {
        for err in &errors {
            println!(
                "structural error: col {} row {} ({:?}): {}",
                err.column, err.row, err.gate_type, err.message
            );
        }
        ExitCode::FAILURE
    }
}

fn bench(scenario: String, seed: Option<u64>) -> ExitCode {
    let Some(grid) = scenarios::by_name(&scenario) else {
        eprintln!(
            "unknown scenario {scenario:?}; available: {}",
            scenarios::NAMES.join(", ")
        );
        return ExitCode::FAILURE;
    };

    let mut rng = make_rng(seed);
    let start = Instant::now();
    let result = simulate(&grid, rng.as_mut());
    let elapsed = start.elapsed();

    match result {
        Ok(r) => {
            println!(
                "scenario {scenario:?}: {} qubit(s), {:?} ({} measurement(s))",
                r.populated_rows.len(),
                elapsed,
                r.measurements.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("scenario {scenario:?} failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run { file } => run(file, cli.seed),
        Command::Validate { file } => validate(file),
        Command::Bench { scenario } => bench(scenario, cli.seed),
    }
}
