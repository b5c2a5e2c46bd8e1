//! Structured Output

use crate::row::ReportRow;

/// Render rows as a prettified JSON array, newline-terminated.
///
/// Unbounded throughput figures serialize as `null`.
pub fn render_structured(rows: &[ReportRow]) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(rows)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_rows() {
        let rows = vec![ReportRow {
            title: "noop#".to_string(),
            ops_per_sec: None,
            variability: 0,
            min: None,
            max: None,
            cycles: 10,
            errors: 0,
        }];

        let json = render_structured(&rows).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["title"], "noop#");
        assert!(value[0]["ops_per_sec"].is_null());
        assert_eq!(value[0]["cycles"], 10);
    }
}
