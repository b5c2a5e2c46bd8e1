//! Report Rows
//!
//! Display-only projection of a [`PerformanceRecord`]. Durations are in
//! milliseconds, so `1000 / duration` is operations per second; the
//! throughput bounds invert the duration extremes (the slowest cycle gives
//! the lowest throughput).

use benchtest_core::PerformanceRecord;
use serde::{Deserialize, Serialize};

/// One measured unit, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Unit name
    pub title: String,
    /// `round(1000 / duration)`; `None` when the duration is zero
    pub ops_per_sec: Option<u64>,
    /// `round(sensitivity * 10000 / duration)`; 0 when the duration is zero
    pub variability: u64,
    /// Lowest throughput, `round(1000 / max)`
    pub min: Option<u64>,
    /// Highest throughput, `round(1000 / min)`
    pub max: Option<u64>,
    /// Cycles executed
    pub cycles: u64,
    /// Cycles that failed
    pub errors: u64,
}

/// `round(scale / value)`, or `None` when that is unbounded
fn invert(scale: f64, value: f64) -> Option<u64> {
    if value > 0.0 && value.is_finite() {
        Some((scale / value).round() as u64)
    } else {
        None
    }
}

impl ReportRow {
    /// Derive the row for unit `title`
    pub fn from_record(title: impl Into<String>, record: &PerformanceRecord) -> Self {
        Self {
            title: title.into(),
            ops_per_sec: invert(1000.0, record.duration),
            variability: invert(record.sensitivity * 10_000.0, record.duration).unwrap_or(0),
            min: invert(1000.0, record.max),
            max: invert(1000.0, record.min),
            cycles: record.cycles,
            errors: record.errors,
        }
    }
}

/// Rows for every unit that has a record, in input order
pub fn collect_rows<'a, I>(records: I) -> Vec<ReportRow>
where
    I: IntoIterator<Item = (&'a str, Option<&'a PerformanceRecord>)>,
{
    records
        .into_iter()
        .filter_map(|(title, record)| record.map(|r| ReportRow::from_record(title, r)))
        .collect()
}
