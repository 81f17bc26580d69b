//! Statistical methods for repeated-measurement summaries.
//!
//! This module provides the numeric core of the pipeline:
//! - Quantile computation with inclusive linear interpolation
//! - IQR-based outlier masking over raw sample sets
//! - Mean / standard deviation / 95% confidence interval summaries
//!   using Student's t critical values

mod interval;
mod outlier;
mod quantile;

pub use interval::{mean, summarize, t_critical_95};
pub use outlier::{apply_mask, iqr_mask};
pub use quantile::{quantile_sorted, quartiles};
