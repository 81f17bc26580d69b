//! Lifecycle of single-run memory artifacts.
//!
//! Cross-process collection leaves one timestamped CSV (plus a paired
//! JSON report) per collector invocation. This module finds the newest
//! of them, re-reads their per-key means as raw samples, writes one
//! aggregated CSV, and deletes what it consumed. Files not matching the
//! suite prefix are never touched.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{summarize_memory, MemorySummary};
use crate::error::{PipelineError, PipelineResult};
use crate::output;
use crate::report::csv::write_memory_csv;
use crate::types::{MeasurementKey, MemSample};

/// Timestamp fragment used in artifact and report file names.
///
/// Second resolution is enough: collector invocations are separated by
/// whole valgrind runs.
pub fn collection_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// One data row read back from a single-run artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactRow {
    /// Series the row belongs to.
    pub key: MeasurementKey,
    /// The row's per-metric means, treated as one raw sample.
    pub sample: MemSample,
}

/// Lists `prefix*.csv` files in `dir`, newest first by modification time.
///
/// A missing directory yields an empty list rather than an error; the
/// caller treats "nothing collected yet" and "nothing to aggregate" the
/// same way.
pub fn discover_artifacts(dir: &Path, prefix: &str) -> PipelineResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut found: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let matches = path.extension().is_some_and(|ext| ext == "csv")
            && entry.file_name().to_string_lossy().starts_with(prefix);
        if !matches {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        found.push((modified, path));
    }

    found.sort_by_key(|(modified, _)| std::cmp::Reverse(*modified));
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// Reads the per-key mean columns of a single-run artifact as samples.
///
/// Columns are located by header name, so column order does not matter.
/// Blank lines are skipped.
///
/// # Errors
///
/// [`PipelineError::Artifact`] when the header misses a required column
/// or a row is truncated or non-numeric.
pub fn read_artifact(path: &Path) -> PipelineResult<Vec<ArtifactRow>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines().enumerate();

    let header = match lines.next() {
        Some((_, line)) => line?,
        None => return Err(artifact_error(path, 1, "empty artifact")),
    };
    let columns: Vec<&str> = header.trim().split(',').collect();
    let locate = |name: &str| -> PipelineResult<usize> {
        columns
            .iter()
            .position(|col| *col == name)
            .ok_or_else(|| artifact_error(path, 1, &format!("missing column '{name}'")))
    };

    let algorithm_col = locate("algorithm")?;
    let operation_col = locate("operation")?;
    let metric_cols = [
        locate("insts_mean")?,
        locate("maxBytes_mean_mb")?,
        locate("maxHeap_mean_mb")?,
        locate("extHeap_mean_mb")?,
        locate("maxStack_mean_mb")?,
    ];
    let width = metric_cols
        .iter()
        .chain([&algorithm_col, &operation_col])
        .max()
        .copied()
        .unwrap_or(0)
        + 1;

    let mut rows = Vec::new();
    for (index, line) in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < width {
            return Err(artifact_error(
                path,
                index + 1,
                &format!("expected at least {width} columns, found {}", fields.len()),
            ));
        }

        let mut metrics = [0.0f64; 5];
        for (value, col) in metrics.iter_mut().zip(metric_cols) {
            *value = fields[col].trim().parse().map_err(|_| {
                artifact_error(path, index + 1, &format!("invalid value '{}'", fields[col]))
            })?;
        }

        rows.push(ArtifactRow {
            key: MeasurementKey::new(fields[algorithm_col], fields[operation_col]),
            sample: MemSample {
                insts: metrics[0],
                total_mb: metrics[1],
                heap_mb: metrics[2],
                extra_heap_mb: metrics[3],
                stack_mb: metrics[4],
            },
        });
    }

    Ok(rows)
}

fn artifact_error(path: &Path, line: usize, message: &str) -> PipelineError {
    PipelineError::Artifact {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    }
}

/// Deletes a consumed artifact and its paired JSON report.
///
/// Deletion failures are reported as warnings; a leftover artifact only
/// means the next aggregation sees one stale file.
fn remove_artifact_pair(csv_path: &Path) {
    if let Err(err) = fs::remove_file(csv_path) {
        output::warn(format!(
            "could not remove artifact {}: {err}",
            csv_path.display()
        ));
    }
    let json_path = csv_path.with_extension("json");
    if json_path.exists() {
        if let Err(err) = fs::remove_file(&json_path) {
            output::warn(format!(
                "could not remove artifact {}: {err}",
                json_path.display()
            ));
        }
    }
}

/// Merges the newest single-run artifacts into one aggregated CSV.
///
/// Takes up to `requested` newest `prefix*.csv` files from `dir`,
/// re-derives filtered statistics per key from their pooled samples,
/// writes `prefix<timestamp>.csv`, and deletes the consumed artifacts
/// with their paired JSON files.
///
/// Returns the aggregated report's path, or `Ok(None)` when there was
/// nothing to aggregate. Fewer artifacts than requested is a warning,
/// not an error.
pub fn aggregate_memory_artifacts(
    dir: &Path,
    prefix: &str,
    requested: usize,
) -> PipelineResult<Option<PathBuf>> {
    let found = discover_artifacts(dir, prefix)?;
    if found.is_empty() {
        output::warn(format!(
            "no artifacts matching {prefix}*.csv in {}, nothing to aggregate",
            dir.display()
        ));
        return Ok(None);
    }

    let used = &found[..found.len().min(requested)];
    if used.len() < requested {
        output::warn(format!(
            "found only {} of {requested} expected artifacts",
            used.len()
        ));
    }
    output::status(format!("aggregating {} artifact(s)", used.len()));

    let mut pooled: BTreeMap<MeasurementKey, Vec<MemSample>> = BTreeMap::new();
    for path in used {
        for row in read_artifact(path)? {
            pooled.entry(row.key).or_default().push(row.sample);
        }
    }

    let rows: Vec<MemorySummary> = pooled
        .into_iter()
        .map(|(key, samples)| summarize_memory(key, &samples))
        .collect();

    let aggregated = dir.join(format!("{prefix}{}.csv", collection_timestamp()));
    write_memory_csv(&aggregated, &rows)?;
    output::success(format!("aggregated report written to {}", aggregated.display()));

    for path in used {
        remove_artifact_pair(path);
    }

    Ok(Some(aggregated))
}
