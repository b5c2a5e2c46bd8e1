//! Groups
//!
//! A [`Group`] is the explicit context a set of related units is measured
//! in. Running it samples every eligible unit in declaration order, stores
//! each record on its unit, then reports the group once. Ineligible units are
//! never invoked and never get a record.

use crate::config::BenchtestConfig;
use benchtest_core::{
    Clock, ConfigError, Cycle, CycleOutcome, Eligibility, OperationError, PerformanceRecord,
    Progress, Sampler, SamplerConfig, SamplerError,
};
use benchtest_report::{OutputFormat, ReportError, Reporter, Sink};
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from running a group
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Sampler(#[from] SamplerError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

type SyncBody = Box<dyn FnMut(Cycle) -> Result<(), OperationError>>;
type AsyncBody =
    Box<dyn FnMut(Cycle) -> Pin<Box<dyn Future<Output = Result<(), OperationError>>>>>;

enum Body {
    Sync(SyncBody),
    Async(AsyncBody),
}

/// A named unit of work
pub struct Unit {
    name: String,
    body: Body,
    performance: Option<PerformanceRecord>,
}

impl std::fmt::Debug for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unit")
            .field("name", &self.name)
            .field("performance", &self.performance)
            .finish_non_exhaustive()
    }
}

impl Unit {
    /// Unit running a synchronous (or callback-style) operation
    pub fn new<O, F>(name: impl Into<String>, mut op: F) -> Self
    where
        F: FnMut(Cycle) -> O + 'static,
        O: CycleOutcome,
    {
        Self {
            name: name.into(),
            body: Body::Sync(Box::new(move |cycle| op(cycle).into_outcome())),
            performance: None,
        }
    }

    /// Unit running an async operation
    pub fn asynchronous<O, F, Fut>(name: impl Into<String>, mut op: F) -> Self
    where
        F: FnMut(Cycle) -> Fut + 'static,
        Fut: Future<Output = O> + 'static,
        O: CycleOutcome,
    {
        Self {
            name: name.into(),
            body: Body::Async(Box::new(move |cycle| {
                let fut = op(cycle);
                Box::pin(async move { fut.await.into_outcome() })
            })),
            performance: None,
        }
    }

    /// Declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record from the last run, if this unit was sampled
    pub fn performance(&self) -> Option<&PerformanceRecord> {
        self.performance.as_ref()
    }
}

/// Everything a group run needs besides the group itself
pub struct RunContext<W: Write> {
    sampler: Sampler,
    eligibility: Eligibility,
    reporter: Reporter<W>,
    progress: Option<Box<dyn Progress>>,
}

impl<W: Write> RunContext<W> {
    /// Context with the default eligibility policy and no progress display
    pub fn new(config: SamplerConfig, format: OutputFormat, sink: W) -> Self {
        Self {
            sampler: Sampler::new(config),
            eligibility: Eligibility::default(),
            reporter: Reporter::new(format, sink),
            progress: None,
        }
    }

    /// Replace the eligibility policy
    pub fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Sample against a specific clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.sampler = Sampler::with_clock(*self.sampler.config(), clock);
        self
    }

    /// Install a per-cycle progress observer
    pub fn with_progress(mut self, progress: impl Progress + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Give back the report sink
    pub fn into_sink(self) -> W {
        self.reporter.into_inner()
    }
}

impl RunContext<Sink> {
    /// Context built from a loaded configuration file
    pub fn from_config(config: &BenchtestConfig) -> Result<Self, ConfigError> {
        Ok(
            Self::new(config.sampler()?, config.output.format, config.output.sink)
                .with_eligibility(config.eligibility()),
        )
    }
}

/// Related units reported together
#[derive(Debug)]
pub struct Group {
    title: String,
    units: Vec<Unit>,
}

impl Group {
    /// Empty group
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            units: Vec::new(),
        }
    }

    /// Add a unit
    pub fn add(&mut self, unit: Unit) -> &mut Self {
        self.units.push(unit);
        self
    }

    /// Add a synchronous unit
    pub fn unit<O, F>(&mut self, name: impl Into<String>, op: F) -> &mut Self
    where
        F: FnMut(Cycle) -> O + 'static,
        O: CycleOutcome,
    {
        self.add(Unit::new(name, op))
    }

    /// Add an async unit
    pub fn unit_async<O, F, Fut>(&mut self, name: impl Into<String>, op: F) -> &mut Self
    where
        F: FnMut(Cycle) -> Fut + 'static,
        Fut: Future<Output = O> + 'static,
        O: CycleOutcome,
    {
        self.add(Unit::asynchronous(name, op))
    }

    /// Group title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Units in declaration order
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Each unit's name with its record, if sampled
    pub fn records(&self) -> impl Iterator<Item = (&str, Option<&PerformanceRecord>)> {
        self.units.iter().map(|u| (u.name(), u.performance()))
    }

    /// Sample every eligible unit, then report the group once
    pub fn run<W: Write>(&mut self, cx: &mut RunContext<W>) -> Result<(), HarnessError> {
        for unit in &mut self.units {
            if !cx.eligibility.is_eligible(&unit.name) {
                debug!(group = %self.title, unit = %unit.name, "not eligible, skipping");
                continue;
            }

            let progress = cx.progress.as_mut().map(|p| &mut **p as &mut dyn Progress);
            let record = match &mut unit.body {
                Body::Sync(op) => cx.sampler.sample_unit(&unit.name, progress, |c| op(c)),
                Body::Async(op) => cx.sampler.sample_unit_async(&unit.name, progress, |c| op(c))?,
            };
            unit.performance = Some(record);
        }

        cx.reporter.report(&self.title, self.records())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchtest_core::ManualClock;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn context(clock: &ManualClock) -> RunContext<Vec<u8>> {
        let config = SamplerConfig::new(10, 100, 0.01).unwrap();
        RunContext::new(config, OutputFormat::Table, Vec::new())
            .with_clock(Arc::new(clock.clone()))
    }

    #[test]
    fn test_only_eligible_units_are_sampled() {
        let clock = ManualClock::new();
        let calls = Rc::new(Cell::new(0u32));

        let mut group = Group::new("Suite");
        let tick = clock.clone();
        group.unit("A#", move |_| tick.advance(1.0));
        let counter = Rc::clone(&calls);
        group.unit("B", move |_| counter.set(counter.get() + 1));

        let mut cx = context(&clock);
        group.run(&mut cx).unwrap();

        assert_eq!(calls.get(), 0);
        assert!(group.units()[0].performance().is_some());
        assert!(group.units()[1].performance().is_none());

        let text = String::from_utf8(cx.into_sink()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("| Suite"));
    }

    #[test]
    fn test_failing_unit_still_reported() {
        let clock = ManualClock::new();
        let mut group = Group::new("Failures");
        group.unit("broken#", |_| Err::<(), _>(OperationError::failed("always")));

        let mut cx = context(&clock);
        group.run(&mut cx).unwrap();

        let record = group.units()[0].performance().copied().unwrap();
        assert_eq!(record.errors, record.cycles);
        assert_eq!(record.cycles, 99);

        let text = String::from_utf8(cx.into_sink()).unwrap();
        assert!(text.contains("broken#"));
    }

    #[test]
    fn test_nothing_eligible_writes_nothing() {
        let clock = ManualClock::new();
        let mut group = Group::new("Quiet");
        group.unit("plain", |_| ());

        let mut cx = context(&clock);
        group.run(&mut cx).unwrap();

        assert!(cx.into_sink().is_empty());
    }

    #[test]
    fn test_all_policy_samples_everything() {
        let clock = ManualClock::new();
        let mut group = Group::new("Everything");
        group.unit("plain", |_| ()).unit("marked#", |_| ());

        let mut cx = context(&clock).with_eligibility(Eligibility::All);
        group.run(&mut cx).unwrap();

        assert!(group.records().all(|(_, record)| record.is_some()));
    }

    #[test]
    fn test_progress_receives_unit_names() {
        let clock = ManualClock::new();
        let seen = Rc::new(Cell::new(0u64));

        let mut group = Group::new("Progress");
        group.unit("tracked#", |_| ());

        let counter = Rc::clone(&seen);
        let mut cx = context(&clock).with_progress(move |unit: &str, cycle: u64| {
            assert_eq!(unit, "tracked#");
            counter.set(cycle);
        });
        group.run(&mut cx).unwrap();

        assert_eq!(seen.get(), 10);
    }

    #[test]
    fn test_progress_shared_across_units() {
        let clock = ManualClock::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let mut group = Group::new("Progress");
        group.unit("first#", |_| ()).unit("second#", |_| ());

        let log = Rc::clone(&seen);
        let mut cx = context(&clock).with_progress(move |unit: &str, cycle: u64| {
            log.borrow_mut().push((unit.to_string(), cycle));
        });
        group.run(&mut cx).unwrap();
        group.run(&mut cx).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 40);
        assert_eq!(seen[0], ("first#".to_string(), 1));
        assert_eq!(seen[10], ("second#".to_string(), 1));
        assert_eq!(seen[39], ("second#".to_string(), 10));
    }

    #[test]
    fn test_async_unit() {
        let clock = ManualClock::new();
        let mut group = Group::new("Async");
        let tick = clock.clone();
        group.unit_async("sleepless#", move |_| {
            let tick = tick.clone();
            async move {
                tick.advance(0.5);
                Ok::<(), anyhow::Error>(())
            }
        });

        let mut cx = context(&clock);
        group.run(&mut cx).unwrap();

        let record = group.units()[0].performance().copied().unwrap();
        assert!((record.duration - 0.5).abs() < 1e-9);
    }
}
