//! JSON report writer for memory sessions.
//!
//! The JSON side carries what the CSV cannot: the raw per-run samples
//! next to each summary, so a suspicious row can be re-examined without
//! re-running valgrind. Field names ending in `_mb` match the CSV
//! columns they summarize.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::aggregate::MemorySummary;
use crate::error::PipelineResult;
use crate::types::{MemSample, SummaryStatistic};

/// Top-level JSON document of one memory session.
#[derive(Debug, Serialize)]
pub struct MemoryReport {
    /// File name of the measured binary.
    pub binary: String,
    /// Suite tag, `kem` or `sig`.
    pub mode: String,
    /// Samples requested per algorithm/operation pair.
    pub num_runs_requested: usize,
    /// Collection timestamp, same fragment as in the file name.
    pub timestamp: String,
    /// algorithm -> operation -> report.
    pub results: BTreeMap<String, BTreeMap<String, OperationReport>>,
}

/// Raw samples and summary of one algorithm/operation pair.
#[derive(Debug, Serialize)]
pub struct OperationReport {
    /// Per-metric raw sample lists, in collection order.
    pub raw: RawSampleLists,
    /// Filtered summary over the same samples.
    pub summary: OperationSummary,
}

/// Column-oriented raw samples: one list per metric, positions align
/// across lists.
#[derive(Debug, Default, Serialize)]
pub struct RawSampleLists {
    /// Instruction counts at peak.
    pub insts: Vec<f64>,
    /// Total peak allocation, MiB.
    #[serde(rename = "maxBytes_mb")]
    pub total_mb: Vec<f64>,
    /// Useful heap at peak, MiB.
    #[serde(rename = "maxHeap_mb")]
    pub heap_mb: Vec<f64>,
    /// Allocator overhead at peak, MiB.
    #[serde(rename = "extHeap_mb")]
    pub extra_heap_mb: Vec<f64>,
    /// Stack usage at peak, MiB.
    #[serde(rename = "maxStack_mb")]
    pub stack_mb: Vec<f64>,
}

/// Summary block mirroring the CSV columns.
#[derive(Debug, Serialize)]
pub struct OperationSummary {
    /// Samples collected.
    pub num_runs_raw: usize,
    /// Samples retained after outlier filtering.
    pub num_runs_filtered: usize,
    /// Instruction count statistics.
    pub insts: SummaryStatistic,
    /// Total peak allocation statistics, MiB.
    #[serde(rename = "maxBytes_mb")]
    pub total_mb: SummaryStatistic,
    /// Useful heap statistics, MiB.
    #[serde(rename = "maxHeap_mb")]
    pub heap_mb: SummaryStatistic,
    /// Allocator overhead statistics, MiB.
    #[serde(rename = "extHeap_mb")]
    pub extra_heap_mb: SummaryStatistic,
    /// Stack usage statistics, MiB.
    #[serde(rename = "maxStack_mb")]
    pub stack_mb: SummaryStatistic,
}

impl OperationReport {
    /// Builds the report block from the session's samples and their
    /// summary.
    pub fn new(samples: &[MemSample], summary: &MemorySummary) -> Self {
        let mut raw = RawSampleLists::default();
        for sample in samples {
            raw.insts.push(sample.insts);
            raw.total_mb.push(sample.total_mb);
            raw.heap_mb.push(sample.heap_mb);
            raw.extra_heap_mb.push(sample.extra_heap_mb);
            raw.stack_mb.push(sample.stack_mb);
        }
        Self {
            raw,
            summary: OperationSummary {
                num_runs_raw: summary.num_runs_raw,
                num_runs_filtered: summary.num_runs_filtered,
                insts: summary.insts,
                total_mb: summary.total_mb,
                heap_mb: summary.heap_mb,
                extra_heap_mb: summary.extra_heap_mb,
                stack_mb: summary.stack_mb,
            },
        }
    }
}

/// Serializes a memory report to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty(report: &MemoryReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Writes a memory report next to its CSV.
pub fn write_memory_report(path: &Path, report: &MemoryReport) -> PipelineResult<()> {
    let text = to_json_pretty(report)?;
    fs::write(path, text)?;
    Ok(())
}
