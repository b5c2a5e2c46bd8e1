//! Reporter
//!
//! Invoked once per group after every member has been sampled. Units that
//! were never sampled are skipped; a group with nothing measured writes
//! nothing at all.

use crate::OutputFormat;
use crate::json::render_structured;
use crate::row::{ReportRow, collect_rows};
use crate::table::render_table;
use benchtest_core::PerformanceRecord;
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, info};

/// Errors while emitting a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render `rows` in `format`; `None` when there is nothing to show
pub fn render(
    format: OutputFormat,
    group_title: &str,
    rows: &[ReportRow],
) -> Result<Option<String>, ReportError> {
    if rows.is_empty() {
        return Ok(None);
    }

    let text = match format {
        OutputFormat::Table => render_table(group_title, rows),
        OutputFormat::Structured => render_structured(rows)?,
    };
    Ok(Some(text))
}

/// Writes group summaries to a sink
#[derive(Debug)]
pub struct Reporter<W: Write> {
    format: OutputFormat,
    sink: W,
}

impl<W: Write> Reporter<W> {
    /// Reporter writing `format` output to `sink`
    pub fn new(format: OutputFormat, sink: W) -> Self {
        Self { format, sink }
    }

    /// Output format in use
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Summarise one group.
    ///
    /// `records` pairs each unit name with its record, if it was sampled.
    pub fn report<'a, I>(&mut self, group_title: &str, records: I) -> Result<(), ReportError>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a PerformanceRecord>)>,
    {
        let rows = collect_rows(records);

        let Some(text) = render(self.format, group_title, &rows)? else {
            debug!(group = group_title, "no measured units, nothing to report");
            return Ok(());
        };

        self.sink.write_all(text.as_bytes())?;
        self.sink.flush()?;
        info!(group = group_title, rows = rows.len(), format = ?self.format, "group reported");
        Ok(())
    }

    /// Give back the sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}
