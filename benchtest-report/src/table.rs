//! Table Output
//!
//! Fixed-width, `|`-delimited table: a header row, a rule row and one row per
//! measured unit. The name column is left-aligned and headed by the group
//! title; numeric columns are right-aligned and their rule cells end in `:`.
//! Every column is as wide as its widest cell, header label included.

use crate::row::ReportRow;

const HEADERS: [&str; 6] = ["Ops/Sec", "+/-", "Min", "Max", "Sample", "Errors"];

/// Minimum width of the name column
const MIN_TITLE_WIDTH: usize = 4;

/// Text for an inverted value that has no finite bound
const UNBOUNDED: &str = "Infinity";

fn bound(value: Option<u64>) -> String {
    value.map_or_else(|| UNBOUNDED.to_string(), |v| v.to_string())
}

fn numeric_cells(row: &ReportRow) -> [String; 6] {
    [
        bound(row.ops_per_sec),
        row.variability.to_string(),
        bound(row.min),
        bound(row.max),
        row.cycles.to_string(),
        row.errors.to_string(),
    ]
}

fn width(s: &str) -> usize {
    s.chars().count()
}

/// Render `rows` under `group_title`; empty when there are no rows
pub fn render_table(group_title: &str, rows: &[ReportRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let cells: Vec<(&str, [String; 6])> = rows
        .iter()
        .map(|row| (row.title.as_str(), numeric_cells(row)))
        .collect();

    let title_width = cells
        .iter()
        .map(|(title, _)| width(title))
        .fold(width(group_title).max(MIN_TITLE_WIDTH), usize::max);

    let mut widths = HEADERS.map(width);
    for (_, numbers) in &cells {
        for (w, cell) in widths.iter_mut().zip(numbers) {
            *w = (*w).max(width(cell));
        }
    }

    let mut output = String::new();

    // Header
    output.push_str(&format!("| {:<w$} |", group_title, w = title_width));
    for (label, w) in HEADERS.iter().zip(widths) {
        output.push_str(&format!(" {:>w$} |", label, w = w));
    }
    output.push('\n');

    // Rule
    output.push_str(&format!("| {} |", "-".repeat(title_width)));
    for w in widths {
        output.push_str(&format!(" {}:|", "-".repeat(w)));
    }
    output.push('\n');

    // Body
    for (title, numbers) in &cells {
        output.push_str(&format!("| {:<w$} |", title, w = title_width));
        for (cell, w) in numbers.iter().zip(widths) {
            output.push_str(&format!(" {:>w$} |", cell, w = w));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, ops: Option<u64>, cycles: u64) -> ReportRow {
        ReportRow {
            title: title.to_string(),
            ops_per_sec: ops,
            variability: 3,
            min: ops.map(|o| o / 2),
            max: ops.map(|o| o * 2),
            cycles,
            errors: 0,
        }
    }

    #[test]
    fn test_layout() {
        let table = render_table("Parsing", &[row("json#", Some(1000), 10)]);
        let expected = "\
| Parsing | Ops/Sec | +/- | Min |  Max | Sample | Errors |
| ------- | -------:| ---:| ---:| ----:| ------:| ------:|
| json#   |    1000 |   3 | 500 | 2000 |     10 |      0 |
";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_columns_align() {
        let table = render_table(
            "G",
            &[
                row("a#", Some(7), 10),
                row("much longer name#", None, 99),
            ],
        );

        let lengths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert_eq!(lengths.len(), 4);
        assert!(lengths.iter().all(|&l| l == lengths[0]));
        assert!(table.contains("Infinity"));
        assert!(table.ends_with('\n'));
    }

    #[test]
    fn test_short_group_title_padded() {
        let table = render_table("G", &[row("a#", Some(1), 1)]);
        assert!(table.starts_with("| G    |"));
    }

    #[test]
    fn test_empty_rows_render_nothing() {
        assert_eq!(render_table("Empty", &[]), "");
    }
}
