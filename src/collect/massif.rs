//! Peak-memory collection through valgrind massif.
//!
//! One sample is one full process execution: the measurement binary runs
//! under `valgrind --tool=massif --stacks=yes`, then `ms_print` renders
//! the profile and the peak snapshot row is extracted from it. Running
//! every sample in a fresh process keeps allocator state from bleeding
//! between repetitions.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::run_captured;
use crate::error::PipelineResult;
use crate::parse::massif::parse_peak_snapshot;
use crate::types::MemSample;

/// Name of the massif profile written next to the measurement binary.
const MASSIF_OUT_FILE: &str = "valgrind-out";

/// Runs one algorithm/operation pair under massif and extracts its peak.
#[derive(Debug, Clone)]
pub struct MassifCollector {
    binary: PathBuf,
    workdir: PathBuf,
    massif_out: PathBuf,
}

impl MassifCollector {
    /// Creates a collector for the given measurement binary.
    ///
    /// The binary's directory becomes the working directory of both tool
    /// invocations, and the massif profile is written there; liboqs test
    /// binaries resolve data files relative to their own location. The
    /// binary path is made absolute up front: the children resolve their
    /// arguments against that working directory, not against the
    /// directory this process was started from.
    ///
    /// # Errors
    ///
    /// [`crate::PipelineError::Io`] when the path is empty or the current
    /// directory needed to absolutize it cannot be determined.
    pub fn new(binary: impl Into<PathBuf>) -> PipelineResult<Self> {
        let binary = std::path::absolute(binary.into())?;
        let workdir = binary
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        let massif_out = workdir.join(MASSIF_OUT_FILE);
        Ok(Self {
            binary,
            workdir,
            massif_out,
        })
    }

    /// The measurement binary this collector runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Takes one peak-memory sample of `algorithm` running the operation
    /// with the given numeric code.
    ///
    /// # Errors
    ///
    /// [`crate::PipelineError::Process`] when valgrind or `ms_print`
    /// cannot be spawned or exits non-zero, and
    /// [`crate::PipelineError::Parse`] when the report carries no usable
    /// peak snapshot.
    pub fn collect_one(&self, algorithm: &str, op_code: u8) -> PipelineResult<MemSample> {
        let mut valgrind = Command::new("valgrind");
        valgrind
            .arg("--tool=massif")
            .arg("--stacks=yes")
            .arg(format!("--massif-out-file={}", self.massif_out.display()))
            .arg(&self.binary)
            .arg(algorithm)
            .arg(op_code.to_string())
            .current_dir(&self.workdir);
        run_captured(&mut valgrind)?;

        let mut ms_print = Command::new("ms_print");
        ms_print.arg(&self.massif_out).current_dir(&self.workdir);
        let output = run_captured(&mut ms_print)?;

        let report = String::from_utf8_lossy(&output.stdout);
        let peak = parse_peak_snapshot(&report)?;
        Ok(peak.to_sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workdir_is_binary_directory() {
        let collector = MassifCollector::new("/opt/liboqs/build/tests/test_kem_mem").unwrap();
        assert_eq!(collector.binary(), Path::new("/opt/liboqs/build/tests/test_kem_mem"));
        assert_eq!(collector.workdir, PathBuf::from("/opt/liboqs/build/tests"));
        assert_eq!(
            collector.massif_out,
            PathBuf::from("/opt/liboqs/build/tests/valgrind-out")
        );
    }

    #[test]
    fn test_relative_binary_is_absolutized() {
        let collector = MassifCollector::new("liboqs/build/tests/test_kem_mem").unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(collector.binary(), cwd.join("liboqs/build/tests/test_kem_mem"));
        assert_eq!(collector.workdir, cwd.join("liboqs/build/tests"));
        assert_eq!(collector.massif_out, cwd.join("liboqs/build/tests/valgrind-out"));
    }

    #[test]
    fn test_bare_binary_name_uses_current_dir() {
        let collector = MassifCollector::new("test_sig_mem").unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(collector.workdir, cwd);
        assert_eq!(collector.massif_out, cwd.join("valgrind-out"));
    }
}
