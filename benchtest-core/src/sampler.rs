//! Adaptive Sampler
//!
//! Runs an operation until its timing is stable enough to trust, then
//! summarises it as a [`PerformanceRecord`].
//!
//! Per cycle:
//! - the operation runs between two clock reads (panics are caught)
//! - a failed cycle is counted and produces no sample
//! - the raw elapsed time is reduced by the clock-read cost and the
//!   bookkeeping cost accumulated so far, floored at zero
//! - the sample joins the series; the series is then assessed: a stable
//!   series ends the run, an exploding one drops the latest sample
//!
//! The cycle counter is an exclusive ceiling: at most `max_cycles - 1`
//! cycles run.

use crate::cycle::{Cycle, CycleOutcome, OperationError};
use crate::measure::{Clock, MonotonicClock, clock_overhead};
use crate::record::{PerformanceRecord, SamplerConfig};
use benchtest_stats::{SampleSeries, StabilityPolicy, Verdict, ZERO_FRACTION_THRESHOLD};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, trace, warn};

/// Errors that prevent a sampling run from starting
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("async sampling needs a multi-thread runtime when called from inside tokio")]
    UnsupportedRuntime,
}

/// Observer notified before every cycle
pub trait Progress {
    /// Called with the unit name and the 1-based cycle number
    fn on_cycle(&mut self, unit: &str, cycle: u64);
}

impl<F> Progress for F
where
    F: FnMut(&str, u64),
{
    fn on_cycle(&mut self, unit: &str, cycle: u64) {
        self(unit, cycle)
    }
}

/// The adaptive sampling loop
#[derive(Debug)]
pub struct Sampler {
    config: SamplerConfig,
    clock: Arc<dyn Clock>,

    // Cached runtime for sample_async outside of tokio
    cached_runtime: Option<tokio::runtime::Runtime>,
}

impl Sampler {
    /// Sampler reading the monotonic clock
    pub fn new(config: SamplerConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }

    /// Sampler reading a caller-supplied clock
    pub fn with_clock(config: SamplerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            cached_runtime: None,
        }
    }

    /// Configuration every run uses
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Sample a synchronous (or callback-style) operation
    pub fn sample<O, F>(&mut self, op: F) -> PerformanceRecord
    where
        F: FnMut(Cycle) -> O,
        O: CycleOutcome,
    {
        self.sample_unit("", None, op)
    }

    /// Sample a synchronous operation on behalf of a named unit
    pub fn sample_unit<O, F>(
        &mut self,
        unit: &str,
        progress: Option<&mut dyn Progress>,
        mut op: F,
    ) -> PerformanceRecord
    where
        F: FnMut(Cycle) -> O,
        O: CycleOutcome,
    {
        run_cycles(&self.config, &self.clock, unit, progress, |cycle| {
            op(cycle).into_outcome()
        })
    }

    /// Sample an async operation; each cycle awaits one future to completion
    pub fn sample_async<O, F, Fut>(&mut self, op: F) -> Result<PerformanceRecord, SamplerError>
    where
        F: FnMut(Cycle) -> Fut,
        Fut: Future<Output = O>,
        O: CycleOutcome,
    {
        self.sample_unit_async("", None, op)
    }

    /// Sample an async operation on behalf of a named unit.
    ///
    /// Inside a multi-thread tokio runtime the ambient handle drives the
    /// futures; otherwise a current-thread runtime is created once and kept
    /// for later runs.
    pub fn sample_unit_async<O, F, Fut>(
        &mut self,
        unit: &str,
        progress: Option<&mut dyn Progress>,
        mut op: F,
    ) -> Result<PerformanceRecord, SamplerError>
    where
        F: FnMut(Cycle) -> Fut,
        Fut: Future<Output = O>,
        O: CycleOutcome,
    {
        if let Ok(handle) = Handle::try_current() {
            if handle.runtime_flavor() != RuntimeFlavor::MultiThread {
                return Err(SamplerError::UnsupportedRuntime);
            }
            let (config, clock) = (&self.config, &self.clock);
            return Ok(tokio::task::block_in_place(|| {
                run_cycles(config, clock, unit, progress, |cycle| {
                    handle.block_on(op(cycle)).into_outcome()
                })
            }));
        }

        let runtime = match self.cached_runtime.take() {
            Some(rt) => rt,
            None => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?,
        };

        let record = run_cycles(&self.config, &self.clock, unit, progress, |cycle| {
            runtime.block_on(op(cycle)).into_outcome()
        });

        self.cached_runtime = Some(runtime);
        Ok(record)
    }
}

// The ceiling may be huge; most runs converge long before it
const INITIAL_CAPACITY: u64 = 1024;

/// The sampling loop shared by the sync and async entry points
fn run_cycles<F>(
    config: &SamplerConfig,
    clock: &Arc<dyn Clock>,
    unit: &str,
    mut progress: Option<&mut dyn Progress>,
    mut invoke: F,
) -> PerformanceRecord
where
    F: FnMut(Cycle) -> Result<(), OperationError>,
{
    let policy = StabilityPolicy::new(config.sensitivity(), config.min_cycles());
    let capacity = config.max_cycles().min(INITIAL_CAPACITY) as usize;
    let mut series = SampleSeries::with_capacity(capacity);

    let perftime = clock_overhead(clock.as_ref());
    let mut computetime = 0.0;
    let mut cycles = 0u64;
    let mut errors = 0u64;
    let mut outliers = 0u64;
    let mut converged = false;

    while cycles + 1 < config.max_cycles() {
        cycles += 1;

        if let Some(progress) = progress.as_mut() {
            progress.on_cycle(unit, cycles);
        }

        let finished = Arc::new(OnceLock::new());
        let cycle = Cycle::new(cycles, Arc::clone(clock), Arc::clone(&finished));

        let begin = clock.now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| invoke(cycle)))
            .unwrap_or_else(|payload| Err(OperationError::from_panic(payload)));
        let returned = clock.now();

        if let Err(err) = outcome {
            if !err.is_measurement_disabled() {
                errors += 1;
                trace!(unit, cycle = cycles, error = %err, "cycle failed");
                continue;
            }
        }

        let end = finished.get().copied().unwrap_or(returned);
        let bookkeeping = clock.now();

        let duration = ((end - begin) - (perftime + computetime)).max(0.0);
        series.push(duration);
        trace!(unit, cycle = cycles, duration, "cycle sampled");

        match policy.assess(&series, cycles) {
            Verdict::Converged => {
                converged = true;
                debug!(
                    unit,
                    cycles,
                    mean = series.mean(),
                    variance = series.variance(),
                    "converged"
                );
                break;
            }
            Verdict::Outlier => {
                series.pop();
                outliers += 1;
                debug!(unit, cycle = cycles, duration, "discarded outlier sample");
            }
            Verdict::Continue => {}
        }

        computetime += (clock.now() - bookkeeping) + perftime;
    }

    if !converged {
        warn!(
            unit,
            cycles,
            errors,
            dispersion = series.dispersion(),
            sensitivity = config.sensitivity(),
            "cycle ceiling reached without converging"
        );
    }

    let duration = if series.is_empty() || series.zero_fraction() >= ZERO_FRACTION_THRESHOLD {
        0.0
    } else {
        series.mean()
    };

    let (min, max) = if series.is_empty() {
        (0.0, 0.0)
    } else {
        (series.min(), series.max())
    };

    PerformanceRecord {
        cycles,
        duration,
        min,
        max,
        sensitivity: config.sensitivity(),
        errors,
        outliers,
        converged,
    }
}
