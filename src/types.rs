//! Shared data types flowing between pipeline stages.

use std::fmt;

use serde::Serialize;

/// Identifies one measured series: an algorithm paired with a primitive
/// operation. Every collection, filtering, and aggregation step is keyed
/// by this pair.
///
/// Ordering is lexicographic on `(algorithm, operation)`, which is also
/// the row order of aggregated reports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeasurementKey {
    /// Algorithm name as liboqs spells it, e.g. `ML-KEM-768`.
    pub algorithm: String,
    /// Operation name, e.g. `keygen` or `decaps`.
    pub operation: String,
}

impl MeasurementKey {
    /// Creates a key from any string-like pair.
    pub fn new(algorithm: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            operation: operation.into(),
        }
    }
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.algorithm, self.operation)
    }
}

/// One peak-memory measurement taken from a single process execution.
///
/// Byte quantities are held in MiB; the instruction count stays in raw
/// instructions. All fields are `f64` because aggregation re-reads samples
/// from intermediate artifacts where they are already real-valued means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemSample {
    /// Instructions executed up to the peak snapshot.
    pub insts: f64,
    /// Total allocated bytes at peak (heap + extra + stacks), in MiB.
    pub total_mb: f64,
    /// Useful heap bytes at peak, in MiB.
    pub heap_mb: f64,
    /// Allocator bookkeeping overhead at peak, in MiB.
    pub extra_heap_mb: f64,
    /// Stack bytes at peak, in MiB.
    pub stack_mb: f64,
}

/// One operation row parsed from a speed benchmark report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedObservation {
    /// Iterations completed within the measurement window.
    pub iterations: u64,
    /// Wall-clock length of the measurement window, in seconds.
    pub total_time_s: f64,
    /// Mean time per iteration, in microseconds.
    pub mean_time_us: f64,
    /// Mean CPU cycles per iteration.
    pub mean_cycles: u64,
}

/// Key and ciphertext sizes reported by a KEM speed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KemSizes {
    /// Public key size in bytes.
    pub public_key_bytes: u64,
    /// Ciphertext size in bytes.
    pub ciphertext_bytes: u64,
    /// Secret key size in bytes.
    pub secret_key_bytes: u64,
    /// Shared secret size in bytes.
    pub shared_secret_bytes: u64,
    /// Claimed NIST security level (1-5).
    pub nist_level: u64,
}

/// Key and signature sizes reported by a signature speed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SigSizes {
    /// Public key size in bytes.
    pub public_key_bytes: u64,
    /// Secret key size in bytes.
    pub secret_key_bytes: u64,
    /// Signature size in bytes.
    pub signature_bytes: u64,
    /// Claimed NIST security level, when the binary reports one.
    pub nist_level: Option<u64>,
}

/// Size metadata attached to a speed summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizeInfo {
    /// Sizes from a KEM binary.
    Kem(KemSizes),
    /// Sizes from a signature binary.
    Sig(SigSizes),
}

/// Mean, sample standard deviation, and 95% confidence interval of one
/// metric over the retained samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStatistic {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator); 0.0 for a single sample.
    pub std: f64,
    /// Lower bound of the 95% confidence interval.
    pub ci_low: f64,
    /// Upper bound of the 95% confidence interval.
    pub ci_high: f64,
}
