//! Quantile computation using Type 7 quantiles (linear interpolation).
//!
//! This module implements Type 7 quantiles following Hyndman & Fan (1996),
//! the inclusive interpolating estimator. Interpolation keeps the quartile
//! fence stable on the small sample sets this pipeline works with, where
//! discontinuous estimators would jump between neighboring observations.
//!
//! **Type 7 formula** (for sorted sample x of size n at probability p):
//! ```text
//! h = (n - 1) * p
//! q = x[floor(h)] + (h - floor(h)) * (x[ceil(h)] - x[floor(h)])
//! ```
//!
//! # Reference
//!
//! Hyndman, R. J. & Fan, Y. (1996). "Sample quantiles in statistical packages."
//! The American Statistician 50(4):361–365.

/// Compute a single quantile from an already sorted slice.
///
/// Uses the Type 7 (inclusive linear interpolation) definition:
/// ```text
/// h = (n - 1) * p
/// q = x[floor(h)] * (ceil(h) - h) + x[ceil(h)] * (h - floor(h))
/// ```
///
/// # Arguments
///
/// * `sorted` - Slice of measurements sorted ascending
/// * `p` - Quantile probability in [0, 1]
///
/// # Returns
///
/// The quantile value at probability `p`.
///
/// # Panics
///
/// Panics if `sorted` is empty or if `p` is outside [0, 1].
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "Cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&p),
        "Quantile probability must be in [0, 1]"
    );

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;

    if lo == hi {
        return sorted[lo];
    }

    sorted[lo] * (hi as f64 - h) + sorted[hi] * (h - lo as f64)
}

/// Compute the first and third quartiles of an unsorted sample.
///
/// The input is copied and sorted; the original order is preserved for the
/// caller, which still needs it to build positional filter masks.
///
/// # Returns
///
/// `(q1, q3)` at probabilities 0.25 and 0.75.
///
/// # Panics
///
/// Panics if `values` has fewer than 2 elements (interpolation between
/// order statistics needs at least a pair).
pub fn quartiles(values: &[f64]) -> (f64, f64) {
    assert!(
        values.len() >= 2,
        "Cannot compute quartiles of fewer than 2 values"
    );

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    (
        quantile_sorted(&sorted, 0.25),
        quantile_sorted(&sorted, 0.75),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_single_element() {
        assert_eq!(quantile_sorted(&[42.0], 0.25), 42.0);
        assert_eq!(quantile_sorted(&[42.0], 0.75), 42.0);
    }

    #[test]
    fn test_quantile_exact_index() {
        // n=5: h = 4 * 0.25 = 1.0 lands exactly on index 1
        let sorted = [10.0, 11.0, 12.0, 13.0, 100.0];
        assert_eq!(quantile_sorted(&sorted, 0.25), 11.0);
        assert_eq!(quantile_sorted(&sorted, 0.75), 13.0);
    }

    #[test]
    fn test_quantile_interpolates() {
        // n=4: h = 3 * 0.25 = 0.75, between indices 0 and 1
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile_sorted(&sorted, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile_sorted(&sorted, 0.75) - 3.25).abs() < 1e-12);
        assert_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
    }

    #[test]
    fn test_quartiles_unsorted_input() {
        let values = [13.0, 100.0, 10.0, 12.0, 11.0];
        let (q1, q3) = quartiles(&values);
        assert_eq!(q1, 11.0);
        assert_eq!(q3, 13.0);
    }

    #[test]
    #[should_panic(expected = "Cannot compute quantile of empty slice")]
    fn test_empty_slice_panics() {
        quantile_sorted(&[], 0.5);
    }

    #[test]
    #[should_panic(expected = "Quantile probability must be in [0, 1]")]
    fn test_out_of_range_probability_panics() {
        quantile_sorted(&[1.0, 2.0], 1.5);
    }

    #[test]
    #[should_panic(expected = "Cannot compute quartiles of fewer than 2 values")]
    fn test_quartiles_single_value_panics() {
        quartiles(&[1.0]);
    }
}
