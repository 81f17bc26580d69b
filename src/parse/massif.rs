//! Extraction of the peak snapshot from an `ms_print` report.
//!
//! `ms_print` renders a massif profile as an ASCII chart followed by
//! snapshot tables. Only two pieces matter here: the header line naming
//! which detailed snapshot is the peak, and that snapshot's table row.
//! The report layout is stable across valgrind releases:
//!
//! ```text
//!  Number of snapshots: 52
//!  Detailed snapshots: [3, 14 (peak), 24, 34, 44]
//!
//! ----------------------------------------------------------------------
//!   n        time(i)         total(B)   useful-heap(B) extra-heap(B)    stacks(B)
//! ----------------------------------------------------------------------
//!  14      4,586,089        2,166,784        2,061,520        84,149       21,115
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::types::MemSample;

static PEAK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+\(peak\)").expect("Invalid peak marker regex"));

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Raw peak-snapshot row of an `ms_print` report, in the units the tool
/// prints: instructions and bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakSnapshot {
    /// Instruction count at the snapshot (`time(i)` column).
    pub instructions: u64,
    /// Total allocated bytes (`total(B)` column).
    pub total_bytes: u64,
    /// Useful heap bytes (`useful-heap(B)` column).
    pub heap_bytes: u64,
    /// Allocator overhead bytes (`extra-heap(B)` column).
    pub extra_heap_bytes: u64,
    /// Stack bytes (`stacks(B)` column).
    pub stack_bytes: u64,
}

impl PeakSnapshot {
    /// Converts the raw row into a pipeline sample, scaling byte columns
    /// to MiB and leaving the instruction count as-is.
    pub fn to_sample(self) -> MemSample {
        MemSample {
            insts: self.instructions as f64,
            total_mb: self.total_bytes as f64 / BYTES_PER_MB,
            heap_mb: self.heap_bytes as f64 / BYTES_PER_MB,
            extra_heap_mb: self.extra_heap_bytes as f64 / BYTES_PER_MB,
            stack_mb: self.stack_bytes as f64 / BYTES_PER_MB,
        }
    }
}

/// Finds the peak snapshot in an `ms_print` report and returns its row.
///
/// The peak index is read from the first `Detailed snapshots:` header
/// that names a `(peak)` entry; the table row is located by its
/// right-justified width-3 index prefix, which is how `ms_print` formats
/// the `n` column.
///
/// # Errors
///
/// * [`ParseError::PeakMarkerNotFound`] when no header names a peak,
///   which happens when the profiled process produced no snapshots worth
///   detailing (or the report is not from `ms_print` at all).
/// * [`ParseError::PeakRowNotFound`] when the announced row is absent.
/// * [`ParseError::MalformedPeakRow`] when the row does not carry five
///   numeric columns after the index.
pub fn parse_peak_snapshot(report: &str) -> Result<PeakSnapshot, ParseError> {
    let peak_index: usize = report
        .lines()
        .filter(|line| line.starts_with(" Detailed snapshots: ["))
        .find_map(|line| {
            let caps = PEAK_MARKER.captures(line)?;
            caps[1].parse().ok()
        })
        .ok_or(ParseError::PeakMarkerNotFound)?;

    // ms_print right-justifies the snapshot index to width 3.
    let prefix = format!("{peak_index:>3}");
    let row = report
        .lines()
        .find(|line| line.starts_with(&prefix))
        .ok_or(ParseError::PeakRowNotFound { index: peak_index })?;

    let cleaned = row.replace(',', "");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    if tokens.len() < 6 {
        return Err(ParseError::MalformedPeakRow {
            line: row.to_string(),
        });
    }

    let mut columns = [0u64; 5];
    for (slot, token) in columns.iter_mut().zip(&tokens[1..6]) {
        *slot = token.parse().map_err(|_| ParseError::MalformedPeakRow {
            line: row.to_string(),
        })?;
    }

    Ok(PeakSnapshot {
        instructions: columns[0],
        total_bytes: columns[1],
        heap_bytes: columns[2],
        extra_heap_bytes: columns[3],
        stack_bytes: columns[4],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"--------------------------------------------------------------------------------
Command:            ./test_kem_mem ML-KEM-512 0
Massif arguments:   --stacks=yes --massif-out-file=valgrind-out
ms_print arguments: valgrind-out
--------------------------------------------------------------------------------

    MB
2.066^                                                                      #
     |                                                                  @@@@#:
     |                                                            @@@@@@@   #:

 Number of snapshots: 52
 Detailed snapshots: [3, 14 (peak), 24, 34, 44]

--------------------------------------------------------------------------------
  n        time(i)         total(B)   useful-heap(B) extra-heap(B)    stacks(B)
--------------------------------------------------------------------------------
  0              0                0                0             0            0
  1      1,054,621           80,368           76,470         3,898            0
  3      2,586,089          161,520          153,371         4,149        4,000
 14      4,586,089        2,166,784        2,061,520        84,149       21,115
 24      5,000,000          100,000           90,000         8,000        2,000
"#;

    #[test]
    fn test_parses_peak_row() {
        let peak = parse_peak_snapshot(REPORT).unwrap();
        assert_eq!(
            peak,
            PeakSnapshot {
                instructions: 4_586_089,
                total_bytes: 2_166_784,
                heap_bytes: 2_061_520,
                extra_heap_bytes: 84_149,
                stack_bytes: 21_115,
            }
        );
    }

    #[test]
    fn test_to_sample_scales_bytes() {
        let sample = parse_peak_snapshot(REPORT).unwrap().to_sample();
        assert_eq!(sample.insts, 4_586_089.0);
        assert!((sample.total_mb - 2_166_784.0 / (1024.0 * 1024.0)).abs() < 1e-12);
        assert!((sample.stack_mb - 21_115.0 / (1024.0 * 1024.0)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_peak_marker() {
        let report = " Number of snapshots: 10\n Detailed snapshots: [2, 5, 8]\n";
        assert_eq!(
            parse_peak_snapshot(report),
            Err(ParseError::PeakMarkerNotFound)
        );
    }

    #[test]
    fn test_peak_marker_on_second_header_line() {
        // a header without a peak entry does not stop the scan
        let report = " Detailed snapshots: [2, 5, 8]\n Detailed snapshots: [3, 14 (peak)]\n 14      4,586,089        2,166,784        2,061,520        84,149       21,115\n";
        let peak = parse_peak_snapshot(report).unwrap();
        assert_eq!(peak.instructions, 4_586_089);
        assert_eq!(peak.total_bytes, 2_166_784);
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(parse_peak_snapshot(""), Err(ParseError::PeakMarkerNotFound));
    }

    #[test]
    fn test_missing_peak_row() {
        let report = " Detailed snapshots: [9 (peak)]\n  1     100     200    150    30    20\n";
        assert_eq!(
            parse_peak_snapshot(report),
            Err(ParseError::PeakRowNotFound { index: 9 })
        );
    }

    #[test]
    fn test_short_peak_row() {
        let report = " Detailed snapshots: [2 (peak)]\n  2      1,000     5,000\n";
        assert!(matches!(
            parse_peak_snapshot(report),
            Err(ParseError::MalformedPeakRow { .. })
        ));
    }

    #[test]
    fn test_non_numeric_peak_row() {
        let report = " Detailed snapshots: [2 (peak)]\n  2      1,000     n/a    150    30    20\n";
        assert!(matches!(
            parse_peak_snapshot(report),
            Err(ParseError::MalformedPeakRow { .. })
        ));
    }
}
