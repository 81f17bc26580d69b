//! # mensura
//!
//! Statistical speed and peak-memory benchmarking for liboqs post-quantum
//! primitives.
//!
//! Process-level measurements are noisy: scheduling, page-cache state, and
//! frequency scaling all leave marks. This crate turns repeated noisy
//! samples into trustworthy numbers by
//! - running each peak-memory sample in its own process under
//!   `valgrind --tool=massif` and reading the peak snapshot via `ms_print`,
//! - masking outliers per series with Tukey's 1.5 IQR fences, and
//! - reporting mean, sample standard deviation, and a Student-t 95%
//!   confidence interval over the retained samples.
//!
//! ## Common Pitfall: Shared-Process Contamination
//!
//! Repeating samples inside one long-lived process lets allocator and
//! cache state bleed between repetitions. For memory numbers meant to be
//! compared across algorithms, prefer cross-process collection: N
//! re-invocations of the collector with `-n 1`, aggregated afterwards
//! (see [`aggregate::run_cross_process`]).
//!
//! ## Quick Start
//!
//! ```ignore
//! use mensura::{aggregate::MemorySession, collect::MassifCollector, BenchConfig, Suite};
//!
//! let config = BenchConfig::quick().algorithm("ML-KEM-768");
//! let collector = MassifCollector::new("liboqs/build/tests/test_kem_mem")?;
//! let paths = MemorySession::new(collector, Suite::Kem, &config).run()?;
//! println!("report at {}", paths.csv.display());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod suites;
mod types;

// Functional modules
pub mod aggregate;
pub mod collect;
pub mod output;
pub mod parse;
pub mod report;
pub mod statistics;

// Re-exports for public API
pub use config::BenchConfig;
pub use error::{ParseError, PipelineError, PipelineResult};
pub use suites::{Suite, KEM_ALGORITHMS, SIG_ALGORITHMS};
pub use types::{
    KemSizes, MeasurementKey, MemSample, SigSizes, SizeInfo, SpeedObservation, SummaryStatistic,
};
