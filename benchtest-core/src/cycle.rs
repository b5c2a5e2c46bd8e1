//! Cycle Handle
//!
//! Every execution of an operation receives a [`Cycle`]. It lets the
//! operation signal completion early ([`Cycle::done`], the callback form) and
//! carries a poisoned view of the unit's performance state: while a cycle is
//! being timed, [`Cycle::performance`] always fails with
//! [`OperationError::MeasurementDisabled`]. An operation that propagates that
//! error is not counted as failed; its cycle is timed as usual.

use crate::measure::Clock;
use crate::record::PerformanceRecord;
use std::any::Any;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Why a cycle did not complete normally
#[derive(Debug, Error)]
pub enum OperationError {
    /// The operation read its own performance state during a timed cycle
    #[error("performance access")]
    MeasurementDisabled,

    /// The operation returned an error
    #[error(transparent)]
    Failed(#[from] anyhow::Error),

    /// The operation panicked
    #[error("operation panicked: {0}")]
    Panicked(String),
}

impl OperationError {
    /// Failure carrying a plain message
    pub fn failed(message: impl std::fmt::Display) -> Self {
        OperationError::Failed(anyhow::anyhow!("{message}"))
    }

    /// Whether this is the measurement-disabled sentinel.
    ///
    /// The sentinel is recognised by kind, including when it has been
    /// wrapped into an `anyhow::Error` by `?` inside the operation.
    pub fn is_measurement_disabled(&self) -> bool {
        match self {
            OperationError::MeasurementDisabled => true,
            OperationError::Failed(err) => err.chain().any(|cause| {
                matches!(
                    cause.downcast_ref::<OperationError>(),
                    Some(OperationError::MeasurementDisabled)
                )
            }),
            OperationError::Panicked(_) => false,
        }
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<OperationError>() {
            Ok(err) => return *err,
            Err(payload) => payload,
        };
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        OperationError::Panicked(message)
    }
}

/// Converts what an operation returns into a cycle outcome
pub trait CycleOutcome {
    /// `Ok(())` for a completed cycle
    fn into_outcome(self) -> Result<(), OperationError>;
}

impl CycleOutcome for () {
    #[inline]
    fn into_outcome(self) -> Result<(), OperationError> {
        Ok(())
    }
}

impl<T, E> CycleOutcome for Result<T, E>
where
    E: Into<OperationError>,
{
    #[inline]
    fn into_outcome(self) -> Result<(), OperationError> {
        self.map(|_| ()).map_err(Into::into)
    }
}

/// Handle passed to the operation for one cycle
#[derive(Debug, Clone)]
pub struct Cycle {
    number: u64,
    clock: Arc<dyn Clock>,
    finished: Arc<OnceLock<f64>>,
}

impl Cycle {
    pub(crate) fn new(number: u64, clock: Arc<dyn Clock>, finished: Arc<OnceLock<f64>>) -> Self {
        Self {
            number,
            clock,
            finished,
        }
    }

    /// 1-based cycle number within the current invocation
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Mark the operation complete now.
    ///
    /// The cycle's end timestamp is taken here instead of when the operation
    /// returns. Only the first call counts.
    pub fn done(&self) {
        let _ = self.finished.set(self.clock.now());
    }

    /// Performance state of the unit, which is unavailable while timing.
    ///
    /// Propagate the error with `?`, or raise it with
    /// `std::panic::panic_any`. Calling `unwrap()` on it panics with a plain
    /// message, which counts as a failed cycle.
    pub fn performance(&self) -> Result<PerformanceRecord, OperationError> {
        Err(OperationError::MeasurementDisabled)
    }
}
