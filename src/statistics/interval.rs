//! Mean, standard deviation, and t-based 95% confidence intervals.
//!
//! Sample counts here are small (tens of runs), so intervals use Student's
//! t critical values rather than the normal approximation:
//! ```text
//! ci = mean ± t(df, 0.975) * s / sqrt(n),  df = n - 1
//! ```
//! with s the sample standard deviation (n-1 denominator).

use crate::types::SummaryStatistic;

/// Two-sided 95% critical value of Student's t distribution.
///
/// Exact table values for 2 <= df <= 30, then the conventional tiers
/// 2.021 (df <= 40), 2.000 (df <= 60), and the normal limit 1.960.
/// df <= 1 returns 0.0: one retained sample carries no spread, and the
/// interval collapses onto the mean rather than blowing up.
pub fn t_critical_95(df: usize) -> f64 {
    match df {
        0 | 1 => 0.0,
        2 => 4.303,
        3 => 3.182,
        4 => 2.776,
        5 => 2.571,
        6 => 2.447,
        7 => 2.365,
        8 => 2.306,
        9 => 2.262,
        10 => 2.228,
        11 => 2.201,
        12 => 2.179,
        13 => 2.160,
        14 => 2.145,
        15 => 2.131,
        16 => 2.120,
        17 => 2.110,
        18 => 2.101,
        19 => 2.093,
        20 => 2.086,
        21 => 2.080,
        22 => 2.074,
        23 => 2.069,
        24 => 2.064,
        25 => 2.060,
        26 => 2.056,
        27 => 2.052,
        28 => 2.048,
        29 => 2.045,
        30 => 2.042,
        31..=40 => 2.021,
        41..=60 => 2.000,
        _ => 1.960,
    }
}

/// Arithmetic mean.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn mean(values: &[f64]) -> f64 {
    assert!(!values.is_empty(), "Cannot take the mean of an empty slice");
    values.iter().sum::<f64>() / values.len() as f64
}

/// Summarizes a sample set into mean, standard deviation, and 95% CI.
///
/// A single value yields `std == 0.0` and an interval of width zero; the
/// result order is invariant (any permutation of `values` summarizes
/// identically).
///
/// # Panics
///
/// Panics if `values` is empty. Callers filter first and guard against
/// empty retained sets, so an empty slice here is a logic error.
pub fn summarize(values: &[f64]) -> SummaryStatistic {
    assert!(!values.is_empty(), "Cannot summarize an empty sample set");

    let n = values.len();
    let m = mean(values);

    if n < 2 {
        return SummaryStatistic {
            mean: m,
            std: 0.0,
            ci_low: m,
            ci_high: m,
        };
    }

    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = variance.sqrt();
    let margin = t_critical_95(n - 1) * std / (n as f64).sqrt();

    SummaryStatistic {
        mean: m,
        std,
        ci_low: m - margin,
        ci_high: m + margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_table_exact_rows() {
        assert_eq!(t_critical_95(2), 4.303);
        assert_eq!(t_critical_95(10), 2.228);
        assert_eq!(t_critical_95(30), 2.042);
    }

    #[test]
    fn test_t_table_tiers() {
        assert_eq!(t_critical_95(31), 2.021);
        assert_eq!(t_critical_95(40), 2.021);
        assert_eq!(t_critical_95(41), 2.000);
        assert_eq!(t_critical_95(45), 2.000);
        assert_eq!(t_critical_95(60), 2.000);
        assert_eq!(t_critical_95(61), 1.960);
        assert_eq!(t_critical_95(100), 1.960);
    }

    #[test]
    fn test_t_table_degenerate_df() {
        assert_eq!(t_critical_95(0), 0.0);
        assert_eq!(t_critical_95(1), 0.0);
    }

    #[test]
    fn test_summarize_single_value() {
        let stat = summarize(&[12.5]);
        assert_eq!(stat.mean, 12.5);
        assert_eq!(stat.std, 0.0);
        assert_eq!(stat.ci_low, 12.5);
        assert_eq!(stat.ci_high, 12.5);
    }

    #[test]
    fn test_summarize_known_values() {
        // mean 11.5, s = sqrt(sum((x-11.5)^2)/3) = sqrt(5/3)
        let stat = summarize(&[10.0, 11.0, 12.0, 13.0]);
        assert!((stat.mean - 11.5).abs() < 1e-12);
        let expected_std = (5.0_f64 / 3.0).sqrt();
        assert!((stat.std - expected_std).abs() < 1e-12);
        // df=3 -> 3.182
        let expected_margin = 3.182 * expected_std / 2.0;
        assert!((stat.ci_high - 11.5 - expected_margin).abs() < 1e-12);
        assert!((11.5 - stat.ci_low - expected_margin).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_order_invariant() {
        // squared deviations are multiples of 0.25, so every partial sum is exact
        let a = summarize(&[1.0, 2.0, 3.0, 4.0]);
        let b = summarize(&[3.0, 1.0, 4.0, 2.0]);
        let c = summarize(&[4.0, 3.0, 2.0, 1.0]);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_two_values_use_zero_multiplier() {
        // df=1 collapses the interval onto the mean
        let stat = summarize(&[10.0, 20.0]);
        assert_eq!(stat.mean, 15.0);
        assert!(stat.std > 0.0);
        assert_eq!(stat.ci_low, 15.0);
        assert_eq!(stat.ci_high, 15.0);
    }

    #[test]
    #[should_panic(expected = "Cannot summarize an empty sample set")]
    fn test_summarize_empty_panics() {
        summarize(&[]);
    }
}
