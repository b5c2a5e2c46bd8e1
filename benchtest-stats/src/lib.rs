#![warn(missing_docs)]
//! benchtest Statistical Engine
//!
//! Provides the online statistics the adaptive sampler relies on:
//! - Running mean and population variance over a mutable sample series
//! - Retained minimum/maximum tracking that survives sample rejection
//! - Stability verdicts (convergence vs. outlier rejection) from the
//!   variance-to-mean ratio

mod series;
mod stability;

pub use series::SampleSeries;
pub use stability::{StabilityPolicy, Verdict};

/// Variance-to-mean ratio above which the latest sample is treated as
/// corrupted by an external pause (GC stall, preemption).
pub const OUTLIER_RATIO: f64 = 5.0;

/// Fraction of zero samples at or above which an operation is considered
/// too fast to resolve with the available clock.
pub const ZERO_FRACTION_THRESHOLD: f64 = 0.8;

/// Default convergence sensitivity (maximum variance/mean ratio).
pub const DEFAULT_SENSITIVITY: f64 = 0.01;
