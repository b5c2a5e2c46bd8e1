#![warn(missing_docs)]
//! benchtest Harness
//!
//! Glue between a test runner and the sampler/reporter pair:
//! - `Group` / `Unit` hold related units and their records, and sequence
//!   sampling and reporting explicitly (no process-wide "current suite")
//! - `RunContext` bundles sampler, eligibility policy, reporter and an
//!   optional progress observer
//! - `BenchtestConfig` loads `benchtest.toml`
//!
//! # Example
//!
//! ```ignore
//! use benchtest_harness::{BenchtestConfig, Group, RunContext};
//!
//! let config = BenchtestConfig::discover().unwrap_or_default();
//! let mut cx = RunContext::from_config(&config)?;
//!
//! let mut group = Group::new("Parsing");
//! group.unit("small document #", |_| parse(SMALL));
//! group.unit("not measured", |_| parse(SMALL));
//! group.run(&mut cx)?;
//! ```

mod config;
mod group;
mod progress;

pub use config::*;
pub use group::{Group, HarnessError, RunContext, Unit};
pub use progress::SpinnerProgress;

use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Extra cycles of slack granted on top of the cycle ceiling
const TIMEOUT_SLACK_CYCLES: u64 = 5;

/// Timeout for a test that is sampled instead of run once.
///
/// The enclosing harness must allow for up to `max_cycles` executions (plus
/// slack) or it will cut the sampling loop short.
pub fn scaled_timeout(test_timeout: Duration, max_cycles: u64) -> Duration {
    let factor = u32::try_from(max_cycles.saturating_add(TIMEOUT_SLACK_CYCLES)).unwrap_or(u32::MAX);
    test_timeout.saturating_mul(factor)
}

/// Install a `tracing` fmt subscriber for benchtest crates.
///
/// `RUST_LOG` wins when set. Does nothing if a global subscriber is already
/// installed.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "benchtest=debug"
    } else {
        "benchtest=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
