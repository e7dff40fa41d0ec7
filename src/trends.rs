//! Generic statistical primitives shared by every analysis window.
//!
//! All series handed to these helpers are stored newest-first, matching the
//! order the data-access layer returns rows in. Helpers that care about
//! chronology (trend, slope) account for that internally; callers never
//! re-sort.
//!
//! Every primitive degrades to a documented neutral value on sparse input
//! (0, or 100 for the consistency score) instead of returning NaN/Infinity.
//! Downstream classification compares these values against fixed thresholds,
//! so a NaN leaking out of here would silently disable alerts.

use statrs::statistics::Statistics;

use crate::error::{AnalysisError, Result};

/// Minimum points for a meaningful long-term regression slope.
const SLOPE_MIN_POINTS: usize = 10;

/// Percent change from the oldest to the newest point of a newest-first series.
///
/// # Algorithm
///
/// `((series[0] - series[last]) / series[last]) * 100`
///
/// Returns 0 for fewer than 2 points or when the oldest value is 0.
pub fn percent_trend(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let newest = series[0];
    let oldest = series[series.len() - 1];
    if oldest == 0.0 {
        return 0.0;
    }
    ((newest - oldest) / oldest) * 100.0
}

/// Consistency score in [0, 100]: 100 minus the coefficient of variation
/// expressed as a percentage.
///
/// Fewer than 2 values score a perfect 100 (a single observation cannot be
/// inconsistent). A zero mean drives the CV unbounded; the clamp resolves
/// that to 0.
pub fn consistency_score(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 100.0;
    }
    let mean = values.iter().mean();
    if mean == 0.0 {
        return 0.0;
    }
    let std_dev = values.iter().population_std_dev();
    let cv_pct = (std_dev / mean).abs() * 100.0;
    (100.0 - cv_pct).clamp(0.0, 100.0)
}

/// Arithmetic mean of the available window; 0 for empty input.
///
/// Used as the personal comparison point for "elevated" / "poor"
/// classifications.
pub fn baseline(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Ordinary-least-squares slope of value against day index for a
/// newest-first series.
///
/// The series is indexed chronologically (index 0 = oldest) so a positive
/// slope always means the metric is rising over time; HRV and RHR shifts are
/// computed with the same convention and stay sign-comparable.
///
/// Requires at least 10 points, else returns 0. A degenerate denominator
/// (all points at one index) also returns 0.
pub fn long_term_slope(series: &[f64]) -> f64 {
    if series.len() < SLOPE_MIN_POINTS {
        return 0.0;
    }

    let n = series.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for (i, value) in series.iter().rev().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += value;
        sum_xy += x * value;
        sum_x2 += x * x;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

/// Pearson correlation coefficient between two equal-length series.
///
/// Mismatched lengths are a caller contract violation and return an error;
/// fewer than 2 points or a zero denominator (a constant series) resolve to
/// `Ok(0.0)`.
pub fn correlation(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(AnalysisError::MismatchedSeries {
            left: x.len(),
            right: y.len(),
        });
    }
    Ok(correlation_pairs(x.iter().copied().zip(y.iter().copied())))
}

/// Pearson correlation over pre-paired observations.
///
/// Infallible variant used internally where pairing already guarantees equal
/// lengths (e.g. sleep efficiency joined with same-day training load).
pub(crate) fn correlation_pairs(pairs: impl Iterator<Item = (f64, f64)>) -> f64 {
    let mut n = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;
    for (x, y) in pairs {
        n += 1.0;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    if n < 2.0 {
        return 0.0;
    }

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_trend_short_series_is_zero() {
        assert_eq!(percent_trend(&[]), 0.0);
        assert_eq!(percent_trend(&[42.0]), 0.0);
    }

    #[test]
    fn test_percent_trend_newest_first_convention() {
        // Efficiency improved from 80 (oldest) to 90 (newest)
        let series = [90.0, 85.0, 80.0];
        assert!((percent_trend(&series) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_percent_trend_zero_oldest_guarded() {
        assert_eq!(percent_trend(&[50.0, 0.0]), 0.0);
    }

    #[test]
    fn test_consistency_score_short_series_is_perfect() {
        assert_eq!(consistency_score(&[]), 100.0);
        assert_eq!(consistency_score(&[7.5]), 100.0);
    }

    #[test]
    fn test_consistency_score_constant_series() {
        assert_eq!(consistency_score(&[420.0, 420.0, 420.0]), 100.0);
    }

    #[test]
    fn test_consistency_score_variable_series_drops() {
        let steady = consistency_score(&[420.0, 430.0, 425.0]);
        let erratic = consistency_score(&[300.0, 540.0, 360.0]);
        assert!(steady > 90.0);
        assert!(erratic < steady);
    }

    #[test]
    fn test_consistency_score_zero_mean_clamps_to_floor() {
        assert_eq!(consistency_score(&[-5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_baseline_defaults() {
        assert_eq!(baseline(&[]), 0.0);
        assert_eq!(baseline(&[55.0]), 55.0);
        assert_eq!(baseline(&[40.0, 60.0]), 50.0);
    }

    #[test]
    fn test_long_term_slope_needs_ten_points() {
        let nine: Vec<f64> = (0..9).map(|i| i as f64).collect();
        assert_eq!(long_term_slope(&nine), 0.0);
    }

    #[test]
    fn test_long_term_slope_sign_follows_chronology() {
        // Newest-first series that rises over time: oldest 40 ... newest 49
        let rising: Vec<f64> = (0..10).rev().map(|i| 40.0 + i as f64).collect();
        assert!((long_term_slope(&rising) - 1.0).abs() < 1e-9);

        let falling: Vec<f64> = (0..10).map(|i| 40.0 + i as f64).collect();
        assert!((long_term_slope(&falling) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_rejects_mismatched_lengths() {
        let err = correlation(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(err, AnalysisError::MismatchedSeries { left: 2, right: 1 });
    }

    #[test]
    fn test_correlation_short_and_constant_series_are_zero() {
        assert_eq!(correlation(&[1.0], &[2.0]).unwrap(), 0.0);
        assert_eq!(correlation(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_correlation_perfect_positive_and_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let inverted = [4.0, 3.0, 2.0, 1.0];
        assert!((correlation(&x, &x).unwrap() - 1.0).abs() < 1e-9);
        assert!((correlation(&x, &inverted).unwrap() + 1.0).abs() < 1e-9);
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_correlation_is_symmetric(
            pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..30)
        ) {
            let x: Vec<f64> = pairs.iter().map(|p| p.0).collect();
            let y: Vec<f64> = pairs.iter().map(|p| p.1).collect();
            let xy = correlation(&x, &y).unwrap();
            let yx = correlation(&y, &x).unwrap();
            prop_assert!((xy - yx).abs() < 1e-9);
            prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&xy));
        }

        #[test]
        fn test_self_correlation_of_varied_series(
            mut series in prop::collection::vec(-100.0f64..100.0, 2..30)
        ) {
            // Force at least one distinct value so the series is non-constant
            series[0] = series[series.len() - 1] + 1.0;
            let r = correlation(&series, &series).unwrap();
            prop_assert!((r - 1.0).abs() < 1e-6);
        }

        #[test]
        fn test_consistency_score_stays_in_range(
            values in prop::collection::vec(0.0f64..1000.0, 0..30)
        ) {
            let score = consistency_score(&values);
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn test_percent_trend_finite_for_any_input(
            series in prop::collection::vec(-1000.0f64..1000.0, 0..30)
        ) {
            prop_assert!(percent_trend(&series).is_finite());
        }

        #[test]
        fn test_short_series_neutral_defaults(value in -1000.0f64..1000.0) {
            prop_assert_eq!(percent_trend(&[value]), 0.0);
            prop_assert_eq!(consistency_score(&[value]), 100.0);
            prop_assert_eq!(baseline(&[value]), value);
            prop_assert_eq!(long_term_slope(&[value]), 0.0);
        }
    }
}
