//! Throughput collection through the liboqs speed binaries.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::run_captured;
use crate::error::PipelineResult;
use crate::parse::speed::{parse_speed_report, SpeedRun};
use crate::suites::Suite;

/// Runs the speed binary once per sample and parses its report.
///
/// Unlike memory collection there is no instrumentation layer; the binary
/// measures itself and prints per-operation rows. The `-i` flag asks for
/// the size metadata line, `-d` sets the measurement window.
#[derive(Debug, Clone)]
pub struct SpeedCollector {
    binary: PathBuf,
    suite: Suite,
    duration_secs: u32,
}

impl SpeedCollector {
    /// Creates a collector for the given speed binary.
    pub fn new(binary: impl Into<PathBuf>, suite: Suite, duration_secs: u32) -> Self {
        Self {
            binary: binary.into(),
            suite,
            duration_secs,
        }
    }

    /// The speed binary this collector runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Runs one full measurement of `algorithm` and parses the report.
    ///
    /// # Errors
    ///
    /// [`crate::PipelineError::Process`] when the binary cannot be spawned
    /// or exits non-zero, and [`crate::PipelineError::Parse`] when a
    /// matched report row is numerically malformed.
    pub fn collect_run(&self, algorithm: &str) -> PipelineResult<SpeedRun> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-i")
            .arg("-d")
            .arg(self.duration_secs.to_string())
            .arg(algorithm);
        let output = run_captured(&mut cmd)?;

        let report = String::from_utf8_lossy(&output.stdout);
        Ok(parse_speed_report(self.suite, &report)?)
    }
}
