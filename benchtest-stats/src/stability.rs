//! Stability Verdicts
//!
//! Decides, after each retained sample, whether the series has converged,
//! whether the latest sample should be thrown out as an external pause, or
//! whether sampling should simply continue.
//!
//! Both tests compare the variance-to-mean ratio of the series against a
//! threshold and only apply once the minimum cycle count has been reached.

use crate::OUTLIER_RATIO;
use crate::series::SampleSeries;

/// Outcome of assessing a series after a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Variance/mean is within sensitivity: stop sampling
    Converged,
    /// Variance/mean exploded: drop the latest sample
    Outlier,
    /// Keep sampling
    Continue,
}

/// Thresholds used to assess a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityPolicy {
    /// Maximum variance/mean ratio for convergence
    pub sensitivity: f64,
    /// Variance/mean ratio above which the latest sample is an outlier
    pub outlier_ratio: f64,
    /// Cycle number from which either verdict may be returned
    pub min_cycles: u64,
}

impl StabilityPolicy {
    /// Policy with the standard outlier ratio
    pub fn new(sensitivity: f64, min_cycles: u64) -> Self {
        Self {
            sensitivity,
            outlier_ratio: OUTLIER_RATIO,
            min_cycles,
        }
    }

    /// Assess `series` as observed at 1-based `cycle`
    pub fn assess(&self, series: &SampleSeries, cycle: u64) -> Verdict {
        if cycle < self.min_cycles {
            return Verdict::Continue;
        }

        let ratio = series.dispersion();
        if ratio <= self.sensitivity {
            Verdict::Converged
        } else if ratio > self.outlier_ratio {
            Verdict::Outlier
        } else {
            Verdict::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> SampleSeries {
        let mut s = SampleSeries::new();
        values.iter().for_each(|&v| s.push(v));
        s
    }

    #[test]
    fn test_no_verdict_before_min_cycles() {
        let policy = StabilityPolicy::new(0.01, 10);
        let stable = series(&[1.0; 5]);

        assert_eq!(policy.assess(&stable, 5), Verdict::Continue);
        assert_eq!(policy.assess(&stable, 10), Verdict::Converged);
    }

    #[test]
    fn test_noisy_series_continues() {
        let policy = StabilityPolicy::new(0.01, 1);
        // mean 1.25, variance 0.0625, ratio 0.05
        let noisy = series(&[1.0, 1.5, 1.0, 1.5]);
        assert_eq!(policy.assess(&noisy, 4), Verdict::Continue);
    }

    #[test]
    fn test_spike_is_outlier() {
        let policy = StabilityPolicy::new(0.01, 1);
        let spiked = series(&[1.0, 1.5, 1.0, 1.5, 100.0]);
        assert_eq!(policy.assess(&spiked, 5), Verdict::Outlier);
    }

    #[test]
    fn test_all_zero_series_converges() {
        let policy = StabilityPolicy::new(0.01, 3);
        let zeros = series(&[0.0, 0.0, 0.0]);
        assert_eq!(policy.assess(&zeros, 3), Verdict::Converged);
    }
}
