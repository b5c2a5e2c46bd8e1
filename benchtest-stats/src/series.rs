//! Sample Series
//!
//! Ordered per-cycle durations retained for one sampling invocation.
//!
//! Mean and variance are maintained incrementally (Welford), and the update
//! is reversible so that the most recent sample can be popped when it is
//! judged an outlier. Variance is the population variance: the mean of
//! squared deviations over the retained samples.

use serde::Serialize;

/// Retained durations with running statistics
#[derive(Debug, Clone, Serialize)]
pub struct SampleSeries {
    samples: Vec<f64>,
    mean: f64,
    /// Sum of squared deviations from the running mean
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for SampleSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSeries {
    /// Create an empty series
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty series with room for `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Append a sample and fold it into the running statistics
    pub fn push(&mut self, value: f64) {
        self.samples.push(value);
        let n = self.samples.len() as f64;
        let delta = value - self.mean;
        self.mean += delta / n;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Remove the most recently appended sample and unwind its contribution
    pub fn pop(&mut self) -> Option<f64> {
        let value = self.samples.pop()?;
        let n = self.samples.len();

        if n == 0 {
            self.mean = 0.0;
            self.m2 = 0.0;
            self.min = f64::INFINITY;
            self.max = f64::NEG_INFINITY;
            return Some(value);
        }

        let previous_mean = self.mean;
        self.mean = (previous_mean * (n + 1) as f64 - value) / n as f64;
        self.m2 = (self.m2 - (value - self.mean) * (value - previous_mean)).max(0.0);

        if value <= self.min || value >= self.max {
            self.recompute_extremes();
        }

        Some(value)
    }

    fn recompute_extremes(&mut self) {
        let (min, max) = self
            .samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        self.min = min;
        self.max = max;
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample is retained
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Retained samples in insertion order
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Arithmetic mean of retained samples (0 when empty)
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance of retained samples (0 when empty)
    pub fn variance(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.m2 / self.samples.len() as f64
        }
    }

    /// Variance-to-mean ratio.
    ///
    /// A zero-mean, zero-variance series yields `0.0` instead of NaN.
    pub fn dispersion(&self) -> f64 {
        let variance = self.variance();
        if self.mean == 0.0 && variance == 0.0 {
            0.0
        } else {
            variance / self.mean
        }
    }

    /// Smallest retained sample (`+inf` when empty)
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest retained sample (`-inf` when empty)
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Fraction of retained samples that are zero (or below, after clamping)
    pub fn zero_fraction(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let zeros = self.samples.iter().filter(|&&s| s <= 0.0).count();
        zeros as f64 / self.samples.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> SampleSeries {
        let mut s = SampleSeries::new();
        for &v in values {
            s.push(v);
        }
        s
    }

    #[test]
    fn test_population_variance() {
        let s = series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        assert!((s.mean() - 5.0).abs() < 1e-12);
        // Population variance (divide by n, not n - 1)
        assert!((s.variance() - 4.0).abs() < 1e-12);
        assert_eq!(s.min(), 2.0);
        assert_eq!(s.max(), 9.0);
    }

    #[test]
    fn test_constant_series_has_zero_variance() {
        let s = series(&[1.5; 20]);
        assert_eq!(s.variance(), 0.0);
        assert_eq!(s.dispersion(), 0.0);
    }

    #[test]
    fn test_zero_series_dispersion_is_not_nan() {
        let s = series(&[0.0, 0.0, 0.0]);
        assert_eq!(s.dispersion(), 0.0);
        assert_eq!(s.zero_fraction(), 1.0);
    }

    #[test]
    fn test_pop_restores_statistics() {
        let mut s = series(&[1.0, 1.5, 1.0, 1.5]);
        let mean = s.mean();
        let variance = s.variance();

        s.push(100.0);
        assert_eq!(s.max(), 100.0);

        assert_eq!(s.pop(), Some(100.0));
        assert!((s.mean() - mean).abs() < 1e-9);
        assert!((s.variance() - variance).abs() < 1e-9);
        assert_eq!(s.max(), 1.5);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_pop_to_empty() {
        let mut s = series(&[3.0]);
        assert_eq!(s.pop(), Some(3.0));
        assert!(s.is_empty());
        assert_eq!(s.mean(), 0.0);
        assert_eq!(s.variance(), 0.0);
        assert_eq!(s.min(), f64::INFINITY);
        assert_eq!(s.pop(), None);
    }

    #[test]
    fn test_zero_fraction() {
        let s = series(&[0.0, 0.0, 0.0, 0.0, 2.0]);
        assert!((s.zero_fraction() - 0.8).abs() < 1e-12);
        assert_eq!(SampleSeries::new().zero_fraction(), 0.0);
    }
}
