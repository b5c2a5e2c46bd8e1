//! Clocks
//!
//! The sampler reads time through the [`Clock`] trait so that production runs
//! use a monotonic high-resolution clock while tests drive time by hand.
//! All readings are in milliseconds as `f64`, which keeps sub-microsecond
//! resolution and matches the `1000 / duration` throughput conversions done
//! at report time.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic time source, in milliseconds since an arbitrary origin
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current reading in milliseconds
    fn now(&self) -> f64;
}

/// Cost of one clock read, estimated from two back-to-back readings
#[inline]
pub fn clock_overhead(clock: &dyn Clock) -> f64 {
    (clock.now() - clock.now()).abs()
}

// ─── MonotonicClock ──────────────────────────────────────────────────────────

/// `std::time::Instant` based clock anchored at construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

impl MonotonicClock {
    /// Anchor a new clock at the current instant
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline(always)]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_nanos() as f64 / 1_000_000.0
    }
}

// ─── ManualClock ─────────────────────────────────────────────────────────────

/// Clock that only moves when told to.
///
/// Clones share the same reading, so an operation under test can hold one
/// clone and advance it to simulate its own cost while the sampler reads
/// another. Reading the clock never advances it, so sampler bookkeeping is
/// free under this clock.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock starting at 0 ms
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `ms` milliseconds
    pub fn advance(&self, ms: f64) {
        // fetch_update only fails if the closure returns None
        let _ = self
            .bits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some((f64::from_bits(bits) + ms).to_bits())
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_monotonic_clock_elapsed() {
        let clock = MonotonicClock::new();
        let start = clock.now();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = clock.now() - start;

        // Should be at least a few ms, but well under 100ms
        assert!(elapsed >= 5.0);
        assert!(elapsed < 100.0);
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance(1.5);
        handle.advance(0.25);

        assert_eq!(clock.now(), 1.75);
        assert_eq!(clock_overhead(&clock), 0.0);
    }
}
