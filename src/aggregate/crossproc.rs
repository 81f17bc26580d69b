//! Cross-process memory collection.
//!
//! Direct mode feeds every sample of a key through one long-lived driver
//! process; kernel and cache state accumulated across hundreds of
//! valgrind runs then leaks into later samples. Cross-process mode runs
//! the collector binary itself N times with `-n 1`, so each invocation
//! contributes exactly one artifact taken by a fresh process, and only
//! afterwards merges the artifacts into one report.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::artifacts::aggregate_memory_artifacts;
use crate::collect::render_command;
use crate::config::BenchConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::output;
use crate::suites::Suite;

/// Runs `num_runs` isolated single-sample collector invocations against
/// `binary`, then aggregates their artifacts.
///
/// The collector is this program itself (`collector_exe`), re-invoked
/// with its `mem` subcommand and `-n 1`. Child stdio is inherited so the
/// per-run progress stays visible. A failed child aborts before
/// aggregation: its artifact set is incomplete and would poison the
/// merged statistics.
///
/// Returns the aggregated report path, or `Ok(None)` when no artifacts
/// were found to aggregate.
pub fn run_cross_process(
    suite: Suite,
    binary: &Path,
    config: &BenchConfig,
    collector_exe: &Path,
) -> PipelineResult<Option<PathBuf>> {
    let results_dir = config.results_root.join(suite.memory_results_dir());
    fs::create_dir_all(&results_dir)?;

    for run_index in 1..=config.num_runs {
        let mut cmd = Command::new(collector_exe);
        cmd.arg("mem")
            .arg(binary)
            .arg("-n")
            .arg("1")
            .arg("--results-root")
            .arg(&config.results_root);
        if let Some(algorithm) = &config.algorithm {
            cmd.arg("--alg").arg(algorithm);
        }

        output::status(format!(
            "({suite}) isolated run {run_index}/{}",
            config.num_runs
        ));
        let status = cmd.status()?;
        if !status.success() {
            return Err(PipelineError::Process {
                command: render_command(&cmd),
                status: status.code(),
                stdout: String::new(),
                stderr: String::new(),
            });
        }
    }

    aggregate_memory_artifacts(
        &results_dir,
        suite.memory_artifact_prefix(),
        config.num_runs,
    )
}
