#![warn(missing_docs)]
//! benchtest Core - Adaptive Sampler
//!
//! This crate measures how long a unit of work takes without being told how
//! many times to run it:
//! - `Sampler` repeats an operation until its timing converges or a hard
//!   cycle ceiling is hit, discarding samples hit by external pauses
//! - `Cycle` is the per-execution handle (early completion, poisoned
//!   performance probe)
//! - `Clock` abstracts the time source (monotonic in production, manual in
//!   tests)
//! - `Eligibility` decides from a unit's name whether it is sampled at all

mod cycle;
mod eligibility;
mod measure;
mod record;
mod sampler;

pub use cycle::{Cycle, CycleOutcome, OperationError};
pub use eligibility::{DEFAULT_MARKER, Eligibility, is_eligible};
pub use measure::{Clock, ManualClock, MonotonicClock, clock_overhead};
pub use record::{
    ConfigError, DEFAULT_MAX_CYCLES, DEFAULT_MIN_CYCLES, PerformanceRecord, SamplerConfig,
};
pub use sampler::{Progress, Sampler, SamplerError};

pub use benchtest_stats::DEFAULT_SENSITIVITY;
