//! Turning raw sample sets into summary rows, in-process sessions, and
//! the cross-process aggregation of single-run artifacts.
//!
//! Filtering policy, shared by every flavor: the outlier mask is computed
//! on ONE primary metric per key (total peak MiB for memory, mean time
//! for speed) and applied positionally to all metrics of the same runs,
//! so a summary row always describes one consistent subset of runs.

use crate::statistics::{apply_mask, iqr_mask, mean, summarize};
use crate::types::{MeasurementKey, MemSample, SizeInfo, SpeedObservation, SummaryStatistic};

mod artifacts;
mod crossproc;
mod session;

pub use artifacts::{
    aggregate_memory_artifacts, collection_timestamp, discover_artifacts, read_artifact,
    ArtifactRow,
};
pub use crossproc::run_cross_process;
pub use session::{MemorySession, MemorySessionPaths, SpeedSession};

/// Below this many retained samples the outlier mask is abandoned and all
/// samples kept; a 2-sample "filtered" mean is noise, not robustness.
pub const MIN_RETAINED: usize = 3;

/// Aggregated memory statistics for one algorithm/operation pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySummary {
    /// Which series this row describes.
    pub key: MeasurementKey,
    /// Samples collected.
    pub num_runs_raw: usize,
    /// Samples retained after outlier filtering.
    pub num_runs_filtered: usize,
    /// Instruction count at peak.
    pub insts: SummaryStatistic,
    /// Total peak allocation, MiB.
    pub total_mb: SummaryStatistic,
    /// Useful heap at peak, MiB.
    pub heap_mb: SummaryStatistic,
    /// Allocator overhead at peak, MiB.
    pub extra_heap_mb: SummaryStatistic,
    /// Stack usage at peak, MiB.
    pub stack_mb: SummaryStatistic,
}

/// Aggregated speed statistics for one algorithm/operation pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSummary {
    /// Which series this row describes.
    pub key: MeasurementKey,
    /// Runs collected.
    pub n_raw: usize,
    /// Runs retained after outlier filtering.
    pub n_used: usize,
    /// Mean iterations completed per measurement window.
    pub mean_iterations: f64,
    /// Mean window length, seconds.
    pub mean_total_time_s: f64,
    /// Time per iteration, microseconds.
    pub time_us: SummaryStatistic,
    /// CPU cycles per iteration.
    pub cycles: SummaryStatistic,
    /// Size metadata from the last run that reported it.
    pub sizes: Option<SizeInfo>,
}

/// Per-metric series accumulated over the speed runs of one key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedSeries {
    /// Iterations per run.
    pub iterations: Vec<f64>,
    /// Window length per run, seconds.
    pub total_time_s: Vec<f64>,
    /// Mean time per iteration per run, microseconds.
    pub time_us: Vec<f64>,
    /// Mean cycles per iteration per run.
    pub cycles: Vec<f64>,
}

impl SpeedSeries {
    /// Appends one run's observation to every metric series.
    pub fn push(&mut self, obs: &SpeedObservation) {
        self.iterations.push(obs.iterations as f64);
        self.total_time_s.push(obs.total_time_s);
        self.time_us.push(obs.mean_time_us);
        self.cycles.push(obs.mean_cycles as f64);
    }

    /// Number of runs accumulated.
    pub fn len(&self) -> usize {
        self.time_us.len()
    }

    /// True when no run has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.time_us.is_empty()
    }
}

/// Computes the keep-mask for a primary metric, falling back to keeping
/// everything when filtering would leave fewer than [`MIN_RETAINED`].
fn guarded_mask(primary: &[f64]) -> Vec<bool> {
    let mask = iqr_mask(primary);
    let retained = mask.iter().filter(|&&keep| keep).count();
    if retained < MIN_RETAINED {
        return vec![true; primary.len()];
    }
    mask
}

/// Summarizes one key's memory samples.
///
/// The mask is derived from total peak MiB and applied to all five
/// metrics.
///
/// # Panics
///
/// Panics if `samples` is empty.
pub fn summarize_memory(key: MeasurementKey, samples: &[MemSample]) -> MemorySummary {
    assert!(!samples.is_empty(), "Cannot summarize an empty sample set");

    let total: Vec<f64> = samples.iter().map(|s| s.total_mb).collect();
    let mask = guarded_mask(&total);
    let num_runs_filtered = mask.iter().filter(|&&keep| keep).count();

    let stat = |metric: &dyn Fn(&MemSample) -> f64| -> SummaryStatistic {
        let values: Vec<f64> = samples.iter().map(metric).collect();
        summarize(&apply_mask(&values, &mask))
    };

    MemorySummary {
        key,
        num_runs_raw: samples.len(),
        num_runs_filtered,
        insts: stat(&|s| s.insts),
        total_mb: stat(&|s| s.total_mb),
        heap_mb: stat(&|s| s.heap_mb),
        extra_heap_mb: stat(&|s| s.extra_heap_mb),
        stack_mb: stat(&|s| s.stack_mb),
    }
}

/// Summarizes one key's speed runs.
///
/// The mask is derived from the per-run mean times and applied to all
/// four metrics; iterations and window length are reported as plain
/// means of the retained runs.
///
/// # Panics
///
/// Panics if `series` is empty.
pub fn summarize_speed(
    key: MeasurementKey,
    series: &SpeedSeries,
    sizes: Option<SizeInfo>,
) -> SpeedSummary {
    assert!(!series.is_empty(), "Cannot summarize an empty sample set");

    let mask = guarded_mask(&series.time_us);
    let n_used = mask.iter().filter(|&&keep| keep).count();

    SpeedSummary {
        key,
        n_raw: series.len(),
        n_used,
        mean_iterations: mean(&apply_mask(&series.iterations, &mask)),
        mean_total_time_s: mean(&apply_mask(&series.total_time_s, &mask)),
        time_us: summarize(&apply_mask(&series.time_us, &mask)),
        cycles: summarize(&apply_mask(&series.cycles, &mask)),
        sizes,
    }
}
