//! Extraction of operation rows and size metadata from a liboqs speed
//! report.
//!
//! The speed binaries print one pipe-separated row per operation plus a
//! free-text line with key and ciphertext (or signature) sizes:
//!
//! ```text
//! keygen  |     211554 |          3.000 |          14.181 |      2.973 |     33113 |       6941
//! public key bytes: 800, ciphertext bytes: 768, secret key bytes: 1632, ...
//! ```
//!
//! Rows with too few columns are skipped; matched rows whose numeric
//! fields do not parse are an error for the containing run.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::suites::Suite;
use crate::types::{KemSizes, SigSizes, SizeInfo, SpeedObservation};

static KEM_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(keygen|encaps|decaps)\s*\|(.*)$").expect("Invalid KEM speed row regex")
});

static SIG_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(keypair|sign|verify)\s*\|(.*)$").expect("Invalid SIG speed row regex")
});

static KEM_SIZES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"public key bytes:\s*(\d+),\s*ciphertext bytes:\s*(\d+),\s*secret key bytes:\s*(\d+),\s*shared secret key bytes:\s*(\d+),\s*NIST level:\s*(\d+)",
    )
    .expect("Invalid KEM sizes regex")
});

static SIG_SIZES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"public key bytes:\s*(\d+),\s*secret key bytes:\s*(\d+),\s*signature bytes:\s*(\d+)(?:,\s*NIST level:\s*(\d+))?",
    )
    .expect("Invalid SIG sizes regex")
});

/// Everything extracted from one speed binary invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRun {
    /// Parsed rows, keyed by operation name.
    pub operations: BTreeMap<String, SpeedObservation>,
    /// Size metadata, when the report carried a parseable sizes line.
    pub sizes: Option<SizeInfo>,
}

impl SpeedRun {
    /// Names the expected operations this run did not report.
    pub fn missing_operations(&self, expected: &[&str]) -> Vec<String> {
        expected
            .iter()
            .filter(|op| !self.operations.contains_key(**op))
            .map(|op| (*op).to_string())
            .collect()
    }
}

/// Parses a speed report for the given suite.
///
/// Operation rows are pipe-separated with the layout
/// `name | iterations | total time (s) | time mean (us) | time stdev |
/// cycles mean | cycles stdev`; only iterations, total time, time mean,
/// and cycles mean are kept. Cycle counts may contain grouping spaces.
/// When several sizes lines appear, the last one wins.
///
/// # Errors
///
/// [`ParseError::MalformedSpeedRow`] when a row names an operation but a
/// kept numeric field does not parse.
pub fn parse_speed_report(suite: Suite, report: &str) -> Result<SpeedRun, ParseError> {
    let row_pattern = match suite {
        Suite::Kem => &KEM_ROW,
        Suite::Sig => &SIG_ROW,
    };

    let mut operations = BTreeMap::new();
    let mut sizes = None;

    for line in report.lines() {
        if let Some(caps) = row_pattern.captures(line) {
            let fields: Vec<&str> = caps[2].split('|').map(str::trim).collect();
            if fields.len() < 6 {
                continue;
            }
            let cycles = fields[4].replace(' ', "");
            operations.insert(
                caps[1].to_string(),
                SpeedObservation {
                    iterations: parse_field(line, fields[0])?,
                    total_time_s: parse_field(line, fields[1])?,
                    mean_time_us: parse_field(line, fields[2])?,
                    mean_cycles: parse_field(line, &cycles)?,
                },
            );
        }

        if line.contains("public key bytes:") {
            if let Some(parsed) = parse_sizes(suite, line) {
                sizes = Some(parsed);
            }
        }
    }

    Ok(SpeedRun { operations, sizes })
}

fn parse_field<T: FromStr>(line: &str, raw: &str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| ParseError::MalformedSpeedRow {
        line: line.to_string(),
    })
}

fn parse_sizes(suite: Suite, line: &str) -> Option<SizeInfo> {
    match suite {
        Suite::Kem => {
            let caps = KEM_SIZES.captures(line)?;
            Some(SizeInfo::Kem(KemSizes {
                public_key_bytes: caps[1].parse().ok()?,
                ciphertext_bytes: caps[2].parse().ok()?,
                secret_key_bytes: caps[3].parse().ok()?,
                shared_secret_bytes: caps[4].parse().ok()?,
                nist_level: caps[5].parse().ok()?,
            }))
        }
        Suite::Sig => {
            let caps = SIG_SIZES.captures(line)?;
            Some(SizeInfo::Sig(SigSizes {
                public_key_bytes: caps[1].parse().ok()?,
                secret_key_bytes: caps[2].parse().ok()?,
                signature_bytes: caps[3].parse().ok()?,
                nist_level: caps.get(4).and_then(|m| m.as_str().parse().ok()),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEM_REPORT: &str = "\
Configuration info
==================
Target platform:  x86_64-pc-linux-gnu
Started at Thu Aug 21 10:00:00 2026

Operation                            | Iterations | Total time (s) | Time (us): mean | pop. stdev | CPU cycles: mean | pop. stdev
------------------------------------ | ----------:| --------------:| ---------------:| ----------:| ----------------:| ----------:
keygen                               |     211554 |          3.000 |          14.181 |      2.973 |            33113 |       6941
encaps                               |     179813 |          3.000 |          16.684 |      3.430 |            38962 |       8010
decaps                               |     161002 |          3.000 |          18.633 |      3.624 |            43512 |       8462

public key bytes: 800, ciphertext bytes: 768, secret key bytes: 1632, shared secret key bytes: 32, NIST level: 1
";

    #[test]
    fn test_parses_kem_report() {
        let run = parse_speed_report(Suite::Kem, KEM_REPORT).unwrap();
        assert_eq!(run.operations.len(), 3);

        let keygen = &run.operations["keygen"];
        assert_eq!(keygen.iterations, 211_554);
        assert_eq!(keygen.total_time_s, 3.0);
        assert!((keygen.mean_time_us - 14.181).abs() < 1e-12);
        assert_eq!(keygen.mean_cycles, 33_113);

        assert_eq!(
            run.sizes,
            Some(SizeInfo::Kem(KemSizes {
                public_key_bytes: 800,
                ciphertext_bytes: 768,
                secret_key_bytes: 1632,
                shared_secret_bytes: 32,
                nist_level: 1,
            }))
        );
        assert!(run.missing_operations(Suite::Kem.speed_operations()).is_empty());
    }

    #[test]
    fn test_cycles_with_grouping_spaces() {
        let report = "keygen | 100 | 3.000 | 14.0 | 2.0 | 1 234 567 | 99\n";
        let run = parse_speed_report(Suite::Kem, report).unwrap();
        assert_eq!(run.operations["keygen"].mean_cycles, 1_234_567);
    }

    #[test]
    fn test_short_row_is_skipped() {
        let report = "keygen | 100 | 3.000\ndecaps | 100 | 3.0 | 14.0 | 2.0 | 500 | 9\n";
        let run = parse_speed_report(Suite::Kem, report).unwrap();
        assert!(!run.operations.contains_key("keygen"));
        assert!(run.operations.contains_key("decaps"));
        assert_eq!(
            run.missing_operations(Suite::Kem.speed_operations()),
            vec!["keygen".to_string(), "encaps".to_string()]
        );
    }

    #[test]
    fn test_malformed_numeric_field_is_an_error() {
        let report = "keygen | abc | 3.000 | 14.0 | 2.0 | 500 | 9\n";
        assert!(matches!(
            parse_speed_report(Suite::Kem, report),
            Err(ParseError::MalformedSpeedRow { .. })
        ));
    }

    #[test]
    fn test_sig_report_uses_keypair() {
        let report = "\
keypair | 4459 | 3.000 | 672.786 | 36.136 | 1570856 | 84371
sign    | 1226 | 3.001 | 2448.060 | 65.962 | 5715424 | 154012
verify  | 8243 | 3.000 | 363.951 | 18.259 | 849745 | 42630
public key bytes: 1312, secret key bytes: 2560, signature bytes: 2420, NIST level: 2
";
        let run = parse_speed_report(Suite::Sig, report).unwrap();
        assert_eq!(run.operations.len(), 3);
        assert_eq!(run.operations["keypair"].iterations, 4459);
        assert_eq!(
            run.sizes,
            Some(SizeInfo::Sig(SigSizes {
                public_key_bytes: 1312,
                secret_key_bytes: 2560,
                signature_bytes: 2420,
                nist_level: Some(2),
            }))
        );
    }

    #[test]
    fn test_sig_sizes_without_nist_level() {
        let report = "public key bytes: 897, secret key bytes: 1281, signature bytes: 666\n";
        let run = parse_speed_report(Suite::Sig, report).unwrap();
        assert_eq!(
            run.sizes,
            Some(SizeInfo::Sig(SigSizes {
                public_key_bytes: 897,
                secret_key_bytes: 1281,
                signature_bytes: 666,
                nist_level: None,
            }))
        );
    }

    #[test]
    fn test_last_sizes_line_wins() {
        let report = "\
public key bytes: 800, ciphertext bytes: 768, secret key bytes: 1632, shared secret key bytes: 32, NIST level: 1
public key bytes: 1184, ciphertext bytes: 1088, secret key bytes: 2400, shared secret key bytes: 32, NIST level: 3
";
        let run = parse_speed_report(Suite::Kem, report).unwrap();
        match run.sizes {
            Some(SizeInfo::Kem(sizes)) => assert_eq!(sizes.nist_level, 3),
            other => panic!("unexpected sizes: {other:?}"),
        }
    }

    #[test]
    fn test_header_row_not_mistaken_for_operation() {
        let report = "Operation | Iterations | Total time (s) | mean | stdev | cycles | stdev\n";
        let run = parse_speed_report(Suite::Kem, report).unwrap();
        assert!(run.operations.is_empty());
        assert!(run.sizes.is_none());
    }
}
