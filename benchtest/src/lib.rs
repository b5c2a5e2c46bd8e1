#![warn(missing_docs)]
//! # benchtest
//!
//! Adaptive latency sampling for units of work inside a test harness.
//!
//! Instead of a fixed iteration count, each eligible unit is run until its
//! timing is stable:
//! - **Convergence**: stops once variance/mean drops to the configured
//!   sensitivity after a minimum number of cycles
//! - **Hard ceiling**: never more than `max_cycles - 1` cycles
//! - **Outlier suppression**: samples that blow up variance/mean past 5 are
//!   dropped as external pauses
//! - **Overhead compensation**: clock-read and bookkeeping costs are taken
//!   off every sample
//! - **Failure tolerance**: failing or panicking cycles are counted, not fatal
//! - **Reports**: fixed-width table or structured JSON per group
//!
//! ## Quick Start
//!
//! ```ignore
//! use benchtest::prelude::*;
//!
//! let mut cx = RunContext::new(SamplerConfig::default(), OutputFormat::Table, Sink::Stdout);
//!
//! let mut group = Group::new("Hashing");
//! group.unit("sha256 1KiB #", |_| sha256(&[0u8; 1024]));
//! group.run(&mut cx)?;
//! ```
//!
//! ## Sampling Directly
//!
//! ```ignore
//! let mut sampler = Sampler::new(SamplerConfig::new(10, 100, 0.01)?);
//! let record = sampler.sample(|_| expensive_operation());
//! println!("{} ms over {} cycles", record.duration, record.cycles);
//! ```

// Re-export core types
pub use benchtest_core::{
    Clock, ConfigError, Cycle, CycleOutcome, DEFAULT_MARKER, DEFAULT_MAX_CYCLES,
    DEFAULT_MIN_CYCLES, DEFAULT_SENSITIVITY, Eligibility, ManualClock, MonotonicClock,
    OperationError, PerformanceRecord, Progress, Sampler, SamplerConfig, SamplerError,
    clock_overhead, is_eligible,
};

// Re-export stats
pub use benchtest_stats::{SampleSeries, StabilityPolicy, Verdict};

// Re-export report types
pub use benchtest_report::{
    OutputFormat, ReportError, ReportRow, Reporter, Sink, collect_rows, render,
    render_structured, render_table,
};

// Re-export harness
pub use benchtest_harness::{
    BenchtestConfig, Group, HarnessError, RunContext, SpinnerProgress, Unit, init_tracing,
    scaled_timeout,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Cycle, Eligibility, Group, OperationError, OutputFormat, PerformanceRecord, RunContext,
        Sampler, SamplerConfig, Sink, Unit,
    };
}
