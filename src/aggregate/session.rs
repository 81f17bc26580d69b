//! In-process collection sessions: run one collector over a whole suite
//! and write the summary reports.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

use super::artifacts::collection_timestamp;
use super::{summarize_memory, summarize_speed, SpeedSeries};
use crate::collect::{MassifCollector, SpeedCollector};
use crate::config::BenchConfig;
use crate::error::PipelineResult;
use crate::output;
use crate::report::csv::{write_memory_csv, write_speed_csv};
use crate::report::json::{write_memory_report, MemoryReport, OperationReport};
use crate::suites::Suite;
use crate::types::{MeasurementKey, SizeInfo};

/// Where a memory session left its reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySessionPaths {
    /// Aggregate-ready CSV with one row per algorithm/operation pair.
    pub csv: PathBuf,
    /// JSON report carrying raw samples alongside the summaries.
    pub json: PathBuf,
}

/// Direct-mode memory collection: N massif runs per key inside one
/// invocation, summarized and written as a timestamped CSV/JSON pair.
///
/// Any sample failure aborts the session; a partially sampled key must
/// not end up in an artifact that aggregation would treat as complete.
pub struct MemorySession<'a> {
    collector: MassifCollector,
    suite: Suite,
    config: &'a BenchConfig,
}

impl<'a> MemorySession<'a> {
    /// Creates a session over the given collector.
    pub fn new(collector: MassifCollector, suite: Suite, config: &'a BenchConfig) -> Self {
        Self {
            collector,
            suite,
            config,
        }
    }

    /// Runs the whole session and returns the report paths.
    pub fn run(&self) -> PipelineResult<MemorySessionPaths> {
        let algorithms = resolve_algorithms(self.suite, self.config);
        let operations = self.suite.memory_operations();

        let results_dir = self.config.results_root.join(self.suite.memory_results_dir());
        fs::create_dir_all(&results_dir)?;
        let timestamp = collection_timestamp();
        let csv_path = results_dir.join(format!(
            "{}{timestamp}.csv",
            self.suite.memory_artifact_prefix()
        ));
        let json_path = csv_path.with_extension("json");

        output::status(format!(
            "mode={} binary={} num_runs={} algorithms={}",
            self.suite.label(),
            self.collector.binary().display(),
            self.config.num_runs,
            algorithms.len()
        ));

        let total = algorithms.len() * operations.len() * self.config.num_runs;
        let bar = output::progress_bar(total as u64);

        let mut rows = Vec::new();
        let mut results: BTreeMap<String, BTreeMap<String, OperationReport>> = BTreeMap::new();
        for algorithm in &algorithms {
            for (operation, op_code) in operations {
                bar.set_message(format!("{algorithm} / {operation}"));
                bar.println(format!(
                    "  -> {algorithm} / {operation} ({} runs)",
                    self.config.num_runs
                ));

                let mut samples = Vec::with_capacity(self.config.num_runs);
                for _ in 0..self.config.num_runs {
                    samples.push(self.collector.collect_one(algorithm, *op_code)?);
                    bar.inc(1);
                }

                let key = MeasurementKey::new(*algorithm, *operation);
                let summary = summarize_memory(key, &samples);
                results
                    .entry((*algorithm).to_string())
                    .or_default()
                    .insert((*operation).to_string(), OperationReport::new(&samples, &summary));
                rows.push(summary);
            }
        }
        bar.finish_and_clear();

        write_memory_csv(&csv_path, &rows)?;
        let report = MemoryReport {
            binary: binary_name(&self.collector),
            mode: self.suite.label().to_string(),
            num_runs_requested: self.config.num_runs,
            timestamp,
            results,
        };
        write_memory_report(&json_path, &report)?;

        output::success(format!("CSV written to {}", csv_path.display()));
        output::success(format!("JSON written to {}", json_path.display()));
        Ok(MemorySessionPaths {
            csv: csv_path,
            json: json_path,
        })
    }
}

/// Speed collection: N full measurement runs per algorithm, filtered and
/// summarized into one timestamped CSV.
///
/// Speed runs are cheap to retry, so a failed or incomplete run is
/// dropped with a warning and the session keeps going; keys that end up
/// with no successful run simply emit no row.
pub struct SpeedSession<'a> {
    collector: SpeedCollector,
    suite: Suite,
    config: &'a BenchConfig,
}

impl<'a> SpeedSession<'a> {
    /// Creates a session over the given collector.
    pub fn new(collector: SpeedCollector, suite: Suite, config: &'a BenchConfig) -> Self {
        Self {
            collector,
            suite,
            config,
        }
    }

    /// Runs the whole session and returns the summary CSV path.
    pub fn run(&self) -> PipelineResult<PathBuf> {
        let algorithms = resolve_algorithms(self.suite, self.config);
        let expected_ops = self.suite.speed_operations();

        let results_dir = self.config.results_root.join(self.suite.speed_results_dir());
        fs::create_dir_all(&results_dir)?;
        let csv_path = results_dir.join(format!(
            "{}{}.csv",
            self.suite.speed_file_prefix(),
            collection_timestamp()
        ));

        output::status(format!(
            "mode={} binary={} num_runs={} duration={}s",
            self.suite.label(),
            self.collector.binary().display(),
            self.config.num_runs,
            self.config.duration_secs
        ));

        let mut series: HashMap<MeasurementKey, SpeedSeries> = HashMap::new();
        let mut sizes: HashMap<String, SizeInfo> = HashMap::new();
        for algorithm in &algorithms {
            output::status(format!("=== {algorithm} ==="));
            for run_index in 1..=self.config.num_runs {
                let run = match self.collector.collect_run(algorithm) {
                    Ok(run) => run,
                    Err(err) => {
                        output::warn(format!(
                            "run {run_index}/{} failed: {err}",
                            self.config.num_runs
                        ));
                        continue;
                    }
                };

                if let Some(info) = run.sizes {
                    sizes.insert((*algorithm).to_string(), info);
                }

                let missing = run.missing_operations(expected_ops);
                if !missing.is_empty() {
                    output::warn(format!(
                        "run {run_index}/{} dropped, missing operations: {}",
                        self.config.num_runs,
                        missing.join(", ")
                    ));
                    continue;
                }

                for operation in expected_ops {
                    if let Some(obs) = run.operations.get(*operation) {
                        series
                            .entry(MeasurementKey::new(*algorithm, *operation))
                            .or_default()
                            .push(obs);
                    }
                }
            }
        }

        let mut rows = Vec::new();
        for algorithm in &algorithms {
            for operation in expected_ops {
                let key = MeasurementKey::new(*algorithm, *operation);
                if let Some(metric_series) = series.get(&key) {
                    if !metric_series.is_empty() {
                        rows.push(summarize_speed(
                            key,
                            metric_series,
                            sizes.get(*algorithm).copied(),
                        ));
                    }
                }
            }
        }

        write_speed_csv(&csv_path, &rows, self.suite)?;
        output::success(format!("summary written to {}", csv_path.display()));
        Ok(csv_path)
    }
}

fn resolve_algorithms<'c>(suite: Suite, config: &'c BenchConfig) -> Vec<&'c str> {
    match config.algorithm.as_deref() {
        Some(algorithm) => vec![algorithm],
        None => suite.algorithms().to_vec(),
    }
}

fn binary_name(collector: &MassifCollector) -> String {
    collector
        .binary()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| collector.binary().display().to_string())
}
