//! Error types for the measurement pipeline.
//!
//! Two layers: [`ParseError`] covers failures to extract structured data
//! from a tool's text report, and [`PipelineError`] covers everything a
//! collection or aggregation run can hit (I/O, child processes, malformed
//! intermediate artifacts), wrapping [`ParseError`] where needed.

use std::fmt;
use std::path::PathBuf;

/// Convenience alias used by collection and aggregation entry points.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure to extract structured data from a tool's text report.
///
/// A parse error is always fatal to the single sample that produced it;
/// whether it aborts the whole run is decided by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The `ms_print` report has no `Detailed snapshots:` header naming a
    /// `(peak)` snapshot, so there is no peak to measure.
    PeakMarkerNotFound,

    /// The header named a peak snapshot but no table row carries its index.
    PeakRowNotFound {
        /// Index of the peak snapshot announced in the header.
        index: usize,
    },

    /// The peak table row exists but does not hold five numeric columns.
    MalformedPeakRow {
        /// The offending row, verbatim.
        line: String,
    },

    /// A speed report row matched an operation but a numeric field in it
    /// would not parse.
    MalformedSpeedRow {
        /// The offending row, verbatim.
        line: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::PeakMarkerNotFound => {
                write!(f, "no peak snapshot marker found in ms_print report")
            }
            ParseError::PeakRowNotFound { index } => {
                write!(f, "no table row found for peak snapshot {index}")
            }
            ParseError::MalformedPeakRow { line } => {
                write!(f, "malformed peak snapshot row: '{line}'")
            }
            ParseError::MalformedSpeedRow { line } => {
                write!(f, "malformed speed report row: '{line}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Any failure a collection or aggregation run can encounter.
#[derive(Debug)]
pub enum PipelineError {
    /// Filesystem or pipe error.
    Io(std::io::Error),

    /// A child process could not be run or exited unsuccessfully.
    Process {
        /// The command line that was attempted.
        command: String,
        /// Exit code, if the process ran and was not killed by a signal.
        status: Option<i32>,
        /// Captured standard output (empty when stdio was inherited).
        stdout: String,
        /// Captured standard error (empty when stdio was inherited).
        stderr: String,
    },

    /// A tool report could not be parsed.
    Parse(ParseError),

    /// An intermediate artifact on disk is structurally invalid.
    Artifact {
        /// Path of the artifact being read.
        path: PathBuf,
        /// 1-indexed line where the problem was found.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// A report could not be serialized to JSON.
    Json(serde_json::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(err) => write!(f, "I/O error: {err}"),
            PipelineError::Process {
                command,
                status,
                stderr,
                ..
            } => {
                match status {
                    Some(code) => write!(f, "command `{command}` exited with status {code}")?,
                    None => write!(f, "command `{command}` was terminated by a signal")?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
            PipelineError::Parse(err) => write!(f, "parse error: {err}"),
            PipelineError::Artifact {
                path,
                line,
                message,
            } => {
                write!(f, "invalid artifact {} (line {line}): {message}", path.display())
            }
            PipelineError::Json(err) => write!(f, "JSON serialization error: {err}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(err) => Some(err),
            PipelineError::Parse(err) => Some(err),
            PipelineError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err)
    }
}

impl From<ParseError> for PipelineError {
    fn from(err: ParseError) -> Self {
        PipelineError::Parse(err)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::PeakRowNotFound { index: 14 };
        assert_eq!(err.to_string(), "no table row found for peak snapshot 14");

        let err = ParseError::MalformedPeakRow {
            line: " 14 garbage".to_string(),
        };
        assert!(err.to_string().contains("' 14 garbage'"));
    }

    #[test]
    fn test_process_error_display_includes_stderr() {
        let err = PipelineError::Process {
            command: "valgrind --tool=massif ./test_kem_mem".to_string(),
            status: Some(2),
            stdout: String::new(),
            stderr: "  bad option\n".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("exited with status 2"));
        assert!(text.contains("bad option"));
    }

    #[test]
    fn test_process_error_display_signal() {
        let err = PipelineError::Process {
            command: "ms_print valgrind-out".to_string(),
            status: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by a signal"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PipelineError = io_err.into();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
