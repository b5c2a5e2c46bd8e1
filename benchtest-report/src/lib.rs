#![warn(missing_docs)]
//! benchtest Report - Group Summaries
//!
//! Turns per-unit performance records into display rows and writes them as:
//! - a fixed-width `|`-delimited table (Markdown compatible)
//! - structured JSON rows for machine consumption

mod json;
mod reporter;
mod row;
mod table;

pub use json::render_structured;
pub use reporter::{ReportError, Reporter, render};
pub use row::{ReportRow, collect_rows};
pub use table::render_table;

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-width table
    #[default]
    #[serde(alias = "md", alias = "markdown")]
    Table,
    /// JSON array of rows
    #[serde(alias = "json")]
    Structured,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "md" | "markdown" => Ok(OutputFormat::Table),
            "structured" | "json" => Ok(OutputFormat::Structured),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Console-like report destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sink {
    /// Standard output
    #[default]
    Stdout,
    /// Standard error
    Stderr,
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout => io::stdout().write(buf),
            Sink::Stderr => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("MD".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("structured".parse::<OutputFormat>(), Ok(OutputFormat::Structured));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Structured));
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
