//! Summary statistics of simulated share prices.
//!
//! Conventions follow the usual dataframe defaults so numbers line up with
//! spreadsheet/pandas cross-checks:
//! - quantiles use linear interpolation between closest ranks (R-7)
//! - standard deviation uses the `n - 1` denominator
//! - skewness is the adjusted Fisher–Pearson `G1`, kurtosis the bias-corrected excess `G2`

use crate::domain::SummaryStatistics;
use crate::error::AppError;

/// Multiplier on the reference price for the "10% upside" tail.
pub const UPSIDE_THRESHOLD_FACTOR: f64 = 1.10;

/// Summarize simulated prices.
///
/// Non-positive (and non-finite) prices are dropped first; fails with
/// `EmptyResultSet` when nothing remains.
pub fn summarize(
    results: &[f64],
    reference_price: f64,
    bull_threshold: f64,
) -> Result<SummaryStatistics, AppError> {
    if !(reference_price.is_finite() && reference_price > 0.0) {
        return Err(AppError::config("Reference price must be finite and > 0."));
    }
    if !bull_threshold.is_finite() {
        return Err(AppError::config("Bull threshold must be finite."));
    }

    let mut sorted: Vec<f64> = results.iter().copied().filter(|v| v.is_finite() && *v > 0.0).collect();
    if sorted.is_empty() {
        return Err(AppError::empty_result_set(format!(
            "No positive share prices to summarize ({} value(s) before filtering).",
            results.len()
        )));
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let moments = CentralMoments::new(&sorted, mean);
    let std_dev = moments.sample_std_dev();

    let coefficient_of_variation = if mean == 0.0 { 0.0 } else { std_dev / mean };

    let upside_threshold = reference_price * UPSIDE_THRESHOLD_FACTOR;

    Ok(SummaryStatistics {
        trials: n,
        mean,
        percentile_25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.50),
        percentile_75: quantile_sorted(&sorted, 0.75),
        std_dev,
        coefficient_of_variation,
        skewness: moments.skewness(),
        kurtosis: moments.excess_kurtosis(),
        reference_price,
        bull_threshold,
        mean_upside_percent: (mean - reference_price) / reference_price * 100.0,
        prob_above_10pct_upside: fraction_above(&sorted, upside_threshold),
        prob_bull_scenario: fraction_above(&sorted, bull_threshold),
    })
}

/// `p`-quantile of ascending data by linear interpolation. `sorted` must be non-empty.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let frac = h - h.floor();
    if lo + 1 >= n {
        sorted[n - 1]
    } else {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    }
}

/// Fraction of ascending values strictly greater than `threshold`.
pub fn fraction_above(sorted: &[f64], threshold: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let at_or_below = sorted.partition_point(|&v| v <= threshold);
    (sorted.len() - at_or_below) as f64 / sorted.len() as f64
}

/// Sums of powered deviations from the mean.
struct CentralMoments {
    n: f64,
    s2: f64,
    s3: f64,
    s4: f64,
}

impl CentralMoments {
    fn new(values: &[f64], mean: f64) -> Self {
        let (mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0);
        for v in values {
            let d = v - mean;
            let d2 = d * d;
            s2 += d2;
            s3 += d2 * d;
            s4 += d2 * d2;
        }
        Self {
            n: values.len() as f64,
            s2,
            s3,
            s4,
        }
    }

    fn sample_std_dev(&self) -> f64 {
        if self.n < 2.0 {
            return 0.0;
        }
        (self.s2 / (self.n - 1.0)).sqrt()
    }

    fn skewness(&self) -> f64 {
        let n = self.n;
        if n < 3.0 || self.s2 <= 0.0 {
            return 0.0;
        }
        let m2 = self.s2 / n;
        let m3 = self.s3 / n;
        let g1 = m3 / m2.powf(1.5);
        (n * (n - 1.0)).sqrt() / (n - 2.0) * g1
    }

    fn excess_kurtosis(&self) -> f64 {
        let n = self.n;
        if n < 4.0 || self.s2 <= 0.0 {
            return 0.0;
        }
        let denom = (n - 2.0) * (n - 3.0);
        let scaled = n * (n + 1.0) * (n - 1.0) * self.s4 / (denom * self.s2 * self.s2);
        let adj = 3.0 * (n - 1.0) * (n - 1.0) / denom;
        scaled - adj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn five_point_summary() {
        let stats = summarize(&[100.0, 200.0, 300.0, 400.0, 500.0], 250.0, 450.0).unwrap();
        assert_eq!(stats.trials, 5);
        assert!(close(stats.mean, 300.0, 1e-9));
        assert!(close(stats.median, 300.0, 1e-9));
        assert!(close(stats.percentile_25, 200.0, 1e-9));
        assert!(close(stats.percentile_75, 400.0, 1e-9));
        assert!(close(stats.std_dev, 158.113_883, 1e-5));
        assert!(close(stats.skewness, 0.0, 1e-12));
        assert!(close(stats.kurtosis, -1.2, 1e-9));
        assert!(close(stats.mean_upside_percent, 20.0, 1e-9));
        // 275 threshold: 300, 400, 500 are above.
        assert!(close(stats.prob_above_10pct_upside, 0.6, 1e-12));
        assert!(close(stats.prob_bull_scenario, 0.2, 1e-12));
    }

    #[test]
    fn order_does_not_matter() {
        let a = summarize(&[500.0, 100.0, 400.0, 200.0, 300.0], 250.0, 450.0).unwrap();
        let b = summarize(&[100.0, 200.0, 300.0, 400.0, 500.0], 250.0, 450.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_positive_values_are_filtered() {
        let stats = summarize(&[-50.0, 0.0, 100.0, 200.0, 300.0, 400.0, 500.0], 250.0, 450.0).unwrap();
        assert_eq!(stats.trials, 5);
        assert!(close(stats.mean, 300.0, 1e-9));
    }

    #[test]
    fn empty_or_non_positive_input_fails() {
        let err = summarize(&[], 100.0, 200.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResultSet);

        let err = summarize(&[-1.0, 0.0, -3.0], 100.0, 200.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResultSet);
    }

    #[test]
    fn non_finite_thresholds_are_rejected() {
        let err = summarize(&[100.0, 200.0, 300.0], 150.0, f64::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = summarize(&[100.0, 200.0, 300.0], 150.0, f64::INFINITY).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = summarize(&[100.0, 200.0, 300.0], f64::NAN, 250.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn right_skewed_sample_has_positive_skew() {
        let stats = summarize(&[1.0, 1.0, 1.0, 2.0, 2.0, 10.0], 1.0, 5.0).unwrap();
        assert!(stats.skewness > 1.0, "{}", stats.skewness);
        assert!(stats.kurtosis > 0.0, "{}", stats.kurtosis);
    }

    #[test]
    fn degenerate_samples_do_not_fault() {
        let single = summarize(&[42.0], 40.0, 50.0).unwrap();
        assert_eq!(single.std_dev, 0.0);
        assert_eq!(single.coefficient_of_variation, 0.0);
        assert_eq!(single.skewness, 0.0);
        assert_eq!(single.kurtosis, 0.0);
        assert_eq!(single.median, 42.0);

        let constant = summarize(&[7.0; 10], 5.0, 9.0).unwrap();
        assert_eq!(constant.std_dev, 0.0);
        assert_eq!(constant.skewness, 0.0);
        assert_eq!(constant.kurtosis, 0.0);
    }

    #[test]
    fn tail_thresholds_are_strict() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(fraction_above(&sorted, 2.0), 0.5);
        assert_eq!(fraction_above(&sorted, 4.0), 0.0);
        assert_eq!(fraction_above(&sorted, 0.0), 1.0);
    }

    #[test]
    fn quantile_interpolates() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert!(close(quantile_sorted(&sorted, 0.25), 17.5, 1e-12));
        assert!(close(quantile_sorted(&sorted, 0.5), 25.0, 1e-12));
        assert_eq!(quantile_sorted(&sorted, 1.0), 40.0);
        assert_eq!(quantile_sorted(&sorted, 0.0), 10.0);
    }
}
