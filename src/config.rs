//! Configuration for collection and aggregation runs.

use std::path::PathBuf;

/// Settings shared by every collection flavor.
///
/// A config is built from [`BenchConfig::default`] or one of the presets,
/// then adjusted with the builder methods.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    // =========================================================================
    // Sampling
    // =========================================================================
    /// How many samples to take per algorithm/operation pair.
    ///
    /// In cross-process mode this is the number of isolated collector
    /// invocations, each contributing one sample. Default: 20.
    pub num_runs: usize,

    /// Restrict the run to a single algorithm instead of the whole suite.
    ///
    /// The name must match one of the suite's algorithms exactly.
    /// Default: `None` (measure everything).
    pub algorithm: Option<String>,

    /// Measurement window handed to the speed binary via `-d`, in seconds.
    ///
    /// Ignored by memory collection. Default: 1.
    pub duration_secs: u32,

    // =========================================================================
    // Output
    // =========================================================================
    /// Directory under which per-suite result directories are created.
    ///
    /// Default: the current directory.
    pub results_root: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            num_runs: 20,
            algorithm: None,
            duration_secs: 1,
            results_root: PathBuf::from("."),
        }
    }
}

impl BenchConfig {
    /// Creates a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for a fast smoke run: 5 samples per pair.
    pub fn quick() -> Self {
        Self {
            num_runs: 5,
            ..Default::default()
        }
    }

    /// Preset for publication-grade numbers: 50 samples per pair.
    pub fn thorough() -> Self {
        Self {
            num_runs: 50,
            ..Default::default()
        }
    }

    /// Sets the number of samples per algorithm/operation pair.
    ///
    /// # Panics
    ///
    /// Panics if `num_runs` is 0.
    pub fn num_runs(mut self, num_runs: usize) -> Self {
        assert!(num_runs > 0, "num_runs must be at least 1");
        self.num_runs = num_runs;
        self
    }

    /// Restricts the run to one algorithm.
    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Sets the speed measurement window in seconds.
    ///
    /// # Panics
    ///
    /// Panics if `duration_secs` is 0.
    pub fn duration_secs(mut self, duration_secs: u32) -> Self {
        assert!(duration_secs > 0, "duration_secs must be at least 1");
        self.duration_secs = duration_secs;
        self
    }

    /// Sets the directory under which result directories are created.
    pub fn results_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.results_root = root.into();
        self
    }

    /// Validates settings that arrive from untrusted sources such as the
    /// command line, where the builder panics are not appropriate.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_runs == 0 {
            return Err("num_runs must be at least 1".to_string());
        }
        if self.duration_secs == 0 {
            return Err("duration_secs must be at least 1".to_string());
        }
        Ok(())
    }
}
