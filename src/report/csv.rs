//! CSV report writers.
//!
//! Memory reports use one fixed schema whether they come from a direct
//! session or from aggregation, so aggregation can re-read its own
//! input format. Column names carry the unit (`_mb`) where one applies.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::aggregate::{MemorySummary, SpeedSummary};
use crate::suites::Suite;
use crate::types::SizeInfo;

/// Header of memory reports, both single-run artifacts and aggregated.
pub const MEMORY_CSV_HEADER: &str = "algorithm,operation,num_runs_raw,num_runs_filtered,\
insts_mean,insts_std,insts_ci_low,insts_ci_high,\
maxBytes_mean_mb,maxBytes_std_mb,maxBytes_ci_low_mb,maxBytes_ci_high_mb,\
maxHeap_mean_mb,maxHeap_std_mb,maxHeap_ci_low_mb,maxHeap_ci_high_mb,\
extHeap_mean_mb,extHeap_std_mb,extHeap_ci_low_mb,extHeap_ci_high_mb,\
maxStack_mean_mb,maxStack_std_mb,maxStack_ci_low_mb,maxStack_ci_high_mb";

/// Header of KEM speed reports.
pub const SPEED_KEM_CSV_HEADER: &str = "algorithm,operation,n_raw,n_used,\
mean_iterations,mean_total_time_s,\
time_us_mean,time_us_std,time_us_ci95_low,time_us_ci95_high,\
cycles_mean,cycles_std,cycles_ci95_low,cycles_ci95_high,\
public_key_bytes,ciphertext_bytes,secret_key_bytes,shared_secret_bytes,nist_level";

/// Header of signature speed reports.
pub const SPEED_SIG_CSV_HEADER: &str = "algorithm,operation,n_raw,n_used,\
mean_iterations,mean_total_time_s,\
time_us_mean,time_us_std,time_us_ci95_low,time_us_ci95_high,\
cycles_mean,cycles_std,cycles_ci95_low,cycles_ci95_high,\
public_key_bytes,secret_key_bytes,signature_bytes,nist_level";

/// Writes memory summary rows in the shared schema.
pub fn write_memory_csv(path: &Path, rows: &[MemorySummary]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{MEMORY_CSV_HEADER}")?;

    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            row.key.algorithm,
            row.key.operation,
            row.num_runs_raw,
            row.num_runs_filtered,
            row.insts.mean,
            row.insts.std,
            row.insts.ci_low,
            row.insts.ci_high,
            row.total_mb.mean,
            row.total_mb.std,
            row.total_mb.ci_low,
            row.total_mb.ci_high,
            row.heap_mb.mean,
            row.heap_mb.std,
            row.heap_mb.ci_low,
            row.heap_mb.ci_high,
            row.extra_heap_mb.mean,
            row.extra_heap_mb.std,
            row.extra_heap_mb.ci_low,
            row.extra_heap_mb.ci_high,
            row.stack_mb.mean,
            row.stack_mb.std,
            row.stack_mb.ci_low,
            row.stack_mb.ci_high,
        )?;
    }

    writer.flush()
}

/// Writes speed summary rows; the size columns differ per suite, and
/// rows without size metadata leave them empty.
pub fn write_speed_csv(path: &Path, rows: &[SpeedSummary], suite: Suite) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let header = match suite {
        Suite::Kem => SPEED_KEM_CSV_HEADER,
        Suite::Sig => SPEED_SIG_CSV_HEADER,
    };
    writeln!(writer, "{header}")?;

    for row in rows {
        write!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            row.key.algorithm,
            row.key.operation,
            row.n_raw,
            row.n_used,
            row.mean_iterations,
            row.mean_total_time_s,
            row.time_us.mean,
            row.time_us.std,
            row.time_us.ci_low,
            row.time_us.ci_high,
            row.cycles.mean,
            row.cycles.std,
            row.cycles.ci_low,
            row.cycles.ci_high,
        )?;
        writeln!(writer, ",{}", size_columns(suite, row.sizes))?;
    }

    writer.flush()
}

fn size_columns(suite: Suite, sizes: Option<SizeInfo>) -> String {
    match (suite, sizes) {
        (Suite::Kem, Some(SizeInfo::Kem(s))) => format!(
            "{},{},{},{},{}",
            s.public_key_bytes,
            s.ciphertext_bytes,
            s.secret_key_bytes,
            s.shared_secret_bytes,
            s.nist_level
        ),
        (Suite::Sig, Some(SizeInfo::Sig(s))) => format!(
            "{},{},{},{}",
            s.public_key_bytes,
            s.secret_key_bytes,
            s.signature_bytes,
            s.nist_level.map(|l| l.to_string()).unwrap_or_default()
        ),
        (Suite::Kem, _) => ",,,,".to_string(),
        (Suite::Sig, _) => ",,,".to_string(),
    }
}
