//! Report writers for aggregated results.

pub mod csv;
pub mod json;

pub use csv::{write_memory_csv, write_speed_csv, MEMORY_CSV_HEADER};
pub use json::{write_memory_report, MemoryReport, OperationReport};
