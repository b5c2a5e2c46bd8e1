//! Sampler configuration and the per-invocation result record.

use benchtest_stats::DEFAULT_SENSITIVITY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default minimum cycle number before convergence may be declared
pub const DEFAULT_MIN_CYCLES: u64 = 10;

/// Default exclusive cycle ceiling
pub const DEFAULT_MAX_CYCLES: u64 = 100;

/// Errors from validating a [`SamplerConfig`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("min_cycles must be at least 1")]
    ZeroMinCycles,

    #[error("max_cycles must be at least 2 (got {0}); at most max_cycles - 1 cycles run")]
    MaxCyclesTooSmall(u64),

    #[error("sensitivity must be finite and positive (got {0})")]
    InvalidSensitivity(f64),
}

/// Immutable per-invocation sampler configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplerConfig {
    min_cycles: u64,
    max_cycles: u64,
    sensitivity: f64,
}

impl SamplerConfig {
    /// Validate and build a configuration.
    ///
    /// `min_cycles` larger than `max_cycles` is clamped down rather than
    /// rejected; such a run can never converge and stops at the ceiling.
    pub fn new(min_cycles: u64, max_cycles: u64, sensitivity: f64) -> Result<Self, ConfigError> {
        if min_cycles == 0 {
            return Err(ConfigError::ZeroMinCycles);
        }
        if max_cycles < 2 {
            return Err(ConfigError::MaxCyclesTooSmall(max_cycles));
        }
        if !sensitivity.is_finite() || sensitivity <= 0.0 {
            return Err(ConfigError::InvalidSensitivity(sensitivity));
        }

        Ok(Self {
            min_cycles: min_cycles.min(max_cycles),
            max_cycles,
            sensitivity,
        })
    }

    /// Minimum cycle number before convergence may be declared
    pub fn min_cycles(&self) -> u64 {
        self.min_cycles
    }

    /// Exclusive ceiling on the cycle counter
    pub fn max_cycles(&self) -> u64 {
        self.max_cycles
    }

    /// Maximum variance/mean ratio for convergence
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_cycles: DEFAULT_MIN_CYCLES,
            max_cycles: DEFAULT_MAX_CYCLES,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

/// Result of one sampling invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Cycles executed, failed ones included
    pub cycles: u64,
    /// Representative per-cycle cost in milliseconds, after compensation
    pub duration: f64,
    /// Smallest retained per-cycle duration (ms)
    pub min: f64,
    /// Largest retained per-cycle duration (ms)
    pub max: f64,
    /// Convergence threshold the run was configured with
    pub sensitivity: f64,
    /// Cycles whose operation failed
    pub errors: u64,
    /// Cycles discarded as external pauses
    pub outliers: u64,
    /// Whether the sensitivity criterion was met before the ceiling
    pub converged: bool,
}
