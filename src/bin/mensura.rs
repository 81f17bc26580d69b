//! Benchmark driver for liboqs post-quantum primitives.
//!
//! Subcommands:
//! - `mem`: peak-memory statistics via massif, N samples per pair in this
//!   process (direct mode)
//! - `speed`: throughput statistics from the liboqs speed binaries
//! - `suite`: cross-process memory collection of both suites, one
//!   isolated collector invocation per sample, then aggregation
//! - `aggregate`: merge existing single-run artifacts without collecting
//!
//! ```text
//! mensura mem liboqs/build/tests/test_kem_mem -n 20
//! mensura speed ./speed_sig --alg ML-DSA-65
//! mensura suite -n 20
//! mensura aggregate kem -n 20
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use mensura::aggregate::{
    aggregate_memory_artifacts, run_cross_process, MemorySession, SpeedSession,
};
use mensura::collect::{MassifCollector, SpeedCollector};
use mensura::{output, BenchConfig, PipelineResult, Suite};

#[derive(Parser, Debug)]
#[command(
    name = "mensura",
    about = "Statistical speed and peak-memory benchmarks for liboqs primitives",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect peak-memory statistics with valgrind massif (direct mode)
    Mem(MemArgs),
    /// Collect throughput statistics from a liboqs speed binary
    Speed(SpeedArgs),
    /// Cross-process memory collection for both suites, then aggregation
    Suite(SuiteArgs),
    /// Aggregate existing single-run memory artifacts
    Aggregate(AggregateArgs),
}

#[derive(Args, Debug)]
struct MemArgs {
    /// Path to the memory test binary (test_kem_mem or test_sig_mem)
    binary: PathBuf,

    /// Samples per algorithm/operation pair
    #[arg(short = 'n', long, default_value_t = 20)]
    num_runs: usize,

    /// Measure only this algorithm (liboqs name)
    #[arg(long)]
    alg: Option<String>,

    /// Directory under which result directories are created
    #[arg(long, default_value = ".")]
    results_root: PathBuf,
}

#[derive(Args, Debug)]
struct SpeedArgs {
    /// Path to the speed binary (speed_kem or speed_sig)
    binary: PathBuf,

    /// Measurement runs per algorithm
    #[arg(short = 'n', long, default_value_t = 20)]
    num_runs: usize,

    /// Measure only this algorithm (liboqs name)
    #[arg(long)]
    alg: Option<String>,

    /// Measurement window per run, in seconds
    #[arg(short = 'd', long, default_value_t = 1)]
    duration_secs: u32,

    /// Directory under which result directories are created
    #[arg(long, default_value = ".")]
    results_root: PathBuf,
}

#[derive(Args, Debug)]
struct SuiteArgs {
    /// Samples per algorithm/operation pair (one process each)
    #[arg(short = 'n', long, default_value_t = 20)]
    num_runs: usize,

    /// Path to the KEM memory test binary
    #[arg(long, default_value = "liboqs/build/tests/test_kem_mem")]
    kem_binary: PathBuf,

    /// Path to the signature memory test binary
    #[arg(long, default_value = "liboqs/build/tests/test_sig_mem")]
    sig_binary: PathBuf,

    /// Directory under which result directories are created
    #[arg(long, default_value = ".")]
    results_root: PathBuf,
}

#[derive(Args, Debug)]
struct AggregateArgs {
    /// Which suite's artifacts to aggregate: kem or sig
    suite: String,

    /// How many of the newest artifacts to merge
    #[arg(short = 'n', long, default_value_t = 20)]
    num_runs: usize,

    /// Directory under which result directories live
    #[arg(long, default_value = ".")]
    results_root: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Mem(args) => run_mem(args),
        Command::Speed(args) => run_speed(args),
        Command::Suite(args) => run_suite(args),
        Command::Aggregate(args) => run_aggregate(args),
    };

    if let Err(err) = result {
        output::error(err);
        std::process::exit(1);
    }
}

fn run_mem(args: MemArgs) -> PipelineResult<()> {
    let suite = suite_for_binary(&args.binary);
    let config = BenchConfig {
        num_runs: args.num_runs,
        algorithm: args.alg,
        results_root: args.results_root,
        ..Default::default()
    };
    check_config(&config, suite);

    let collector = MassifCollector::new(&args.binary)?;
    MemorySession::new(collector, suite, &config).run()?;
    Ok(())
}

fn run_speed(args: SpeedArgs) -> PipelineResult<()> {
    let suite = suite_for_binary(&args.binary);
    let config = BenchConfig {
        num_runs: args.num_runs,
        algorithm: args.alg,
        duration_secs: args.duration_secs,
        results_root: args.results_root,
    };
    check_config(&config, suite);

    let collector = SpeedCollector::new(&args.binary, suite, config.duration_secs);
    SpeedSession::new(collector, suite, &config).run()?;
    Ok(())
}

fn run_suite(args: SuiteArgs) -> PipelineResult<()> {
    let collector_exe = std::env::current_exe()?;
    let config = BenchConfig {
        num_runs: args.num_runs,
        results_root: args.results_root,
        ..Default::default()
    };
    check_config(&config, Suite::Kem);

    let mut failed = false;
    for (suite, binary) in [(Suite::Kem, &args.kem_binary), (Suite::Sig, &args.sig_binary)] {
        println!("\n=== {suite}: {} ===", binary.display());
        if !binary.is_file() {
            output::warn(format!("binary {} not found, skipping", binary.display()));
            continue;
        }
        if let Err(err) = run_cross_process(suite, binary, &config, &collector_exe) {
            output::error(format!("{suite} collection aborted: {err}"));
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
    output::success("suite run complete");
    Ok(())
}

fn run_aggregate(args: AggregateArgs) -> PipelineResult<()> {
    let suite = match args.suite.as_str() {
        "kem" => Suite::Kem,
        "sig" => Suite::Sig,
        other => {
            eprintln!("Unknown suite '{other}'. Use kem or sig.");
            std::process::exit(1);
        }
    };

    let dir = args.results_root.join(suite.memory_results_dir());
    aggregate_memory_artifacts(&dir, suite.memory_artifact_prefix(), args.num_runs)?;
    Ok(())
}

/// Infers the suite from the binary name or exits with a usage error.
fn suite_for_binary(binary: &Path) -> Suite {
    if !binary.is_file() {
        eprintln!("Binary not found: {}", binary.display());
        std::process::exit(1);
    }
    let name = binary
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match Suite::from_binary_name(&name) {
        Some(suite) => suite,
        None => {
            eprintln!("Cannot infer suite from binary name '{name}': expected it to contain 'kem' or 'sig'.");
            std::process::exit(1);
        }
    }
}

/// Validates the config and the algorithm filter or exits with a usage
/// error.
fn check_config(config: &BenchConfig, suite: Suite) {
    if let Err(message) = config.validate() {
        eprintln!("Invalid configuration: {message}");
        std::process::exit(1);
    }
    if let Some(algorithm) = &config.algorithm {
        if !suite.algorithms().contains(&algorithm.as_str()) {
            eprintln!(
                "Unknown {suite} algorithm '{algorithm}'. Valid names:\n  {}",
                suite.algorithms().join("\n  ")
            );
            std::process::exit(1);
        }
    }
}
