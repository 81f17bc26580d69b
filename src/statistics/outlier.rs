//! IQR-based outlier masking.
//!
//! Process-level measurements pick up occasional large excursions from
//! scheduling noise, page-cache state, and frequency scaling. Before
//! summarizing, each metric series is masked with Tukey's fences:
//! ```text
//! keep x  <=>  q1 - 1.5*IQR <= x <= q3 + 1.5*IQR,  IQR = q3 - q1
//! ```
//! The mask is positional so it can be computed on one metric and applied
//! to every metric of the same runs.

use super::quantile::quartiles;

/// Builds a keep/discard mask over `values` using the 1.5 IQR fences.
///
/// Both fences are inclusive. Two degenerate inputs yield an all-true
/// mask: fewer than 4 values (quartiles would be meaningless) and a zero
/// IQR (any spread at all would otherwise discard everything off the
/// median plateau).
///
/// # Returns
///
/// A `Vec<bool>` of the same length as `values`, `true` at positions to
/// keep.
pub fn iqr_mask(values: &[f64]) -> Vec<bool> {
    let n = values.len();
    if n < 4 {
        return vec![true; n];
    }

    let (q1, q3) = quartiles(values);
    let iqr = q3 - q1;
    if iqr == 0.0 {
        return vec![true; n];
    }

    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;
    values.iter().map(|v| (lower..=upper).contains(v)).collect()
}

/// Returns the values whose mask position is `true`, preserving order.
///
/// # Panics
///
/// Panics if `values` and `mask` differ in length.
pub fn apply_mask(values: &[f64], mask: &[bool]) -> Vec<f64> {
    assert_eq!(
        values.len(),
        mask.len(),
        "Mask length must match value count"
    );

    values
        .iter()
        .zip(mask)
        .filter(|(_, &keep)| keep)
        .map(|(&v, _)| v)
        .collect()
}
