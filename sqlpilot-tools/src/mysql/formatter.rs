//! Execution result formatting for terminal output
//!
//! Reads are rendered as an aligned table, mutations as a one-line acknowledgment.
//!
//! # Example Output
//!
//! ```text
//! Query executed successfully. Returned 2 rows.
//!
//! id | name  | email
//! ---+-------+------------------
//! 1  | Alice | alice@example.com
//! 2  | Bob   | NULL
//! ```

use serde_json::{Map, Value};

use super::executor::ExecutionOutcome;

const MAX_CELL_CHARS: usize = 50;
const MAX_ROWS_SHOWN: usize = 50;

pub fn format_outcome(outcome: &ExecutionOutcome) -> String {
    match outcome {
        ExecutionOutcome::Rows { columns, rows } => format_rows(columns, rows),
        ExecutionOutcome::Acknowledged { rows_affected } => acknowledgment(*rows_affected),
    }
}

/// Message returned for a committed mutation
pub fn acknowledgment(rows_affected: u64) -> String {
    let noun = if rows_affected == 1 { "row" } else { "rows" };
    format!(
        "SQL command executed successfully. {} {} affected.",
        rows_affected, noun
    )
}

fn format_rows(columns: &[String], rows: &[Map<String, Value>]) -> String {
    if rows.is_empty() {
        return "Query executed successfully but returned no rows.".to_string();
    }

    let mut output = format!(
        "Query executed successfully. Returned {} {}.\n\n",
        rows.len(),
        if rows.len() == 1 { "row" } else { "rows" }
    );

    let cells: Vec<Vec<String>> = rows
        .iter()
        .take(MAX_ROWS_SHOWN)
        .map(|row| {
            columns
                .iter()
                .map(|col| format_cell_value(row.get(col).unwrap_or(&Value::Null)))
                .collect()
        })
        .collect();

    let mut col_widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in col_widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&col_widths)
        .map(|(col, &width)| format!("{:<width$}", col, width = width))
        .collect();
    output.push_str(header.join(" | ").trim_end());
    output.push('\n');

    let separator: Vec<String> = col_widths.iter().map(|&width| "-".repeat(width)).collect();
    output.push_str(&separator.join("-+-"));
    output.push('\n');

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&col_widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        output.push_str(line.join(" | ").trim_end());
        output.push('\n');
    }

    if rows.len() > MAX_ROWS_SHOWN {
        output.push_str(&format!("\n... and {} more rows\n", rows.len() - MAX_ROWS_SHOWN));
    }

    output
}

fn format_cell_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => {
            if s.chars().count() > MAX_CELL_CHARS {
                let head: String = s.chars().take(MAX_CELL_CHARS - 3).collect();
                format!("{}...", head)
            } else {
                s.clone()
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Value) -> Vec<Map<String, Value>> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_format_cell_value() {
        assert_eq!(format_cell_value(&Value::Null), "NULL");
        assert_eq!(format_cell_value(&json!("test")), "test");
        assert_eq!(
            format_cell_value(&json!("é".repeat(60))),
            format!("{}...", "é".repeat(47))
        );
        assert_eq!(format_cell_value(&json!(42)), "42");
        assert_eq!(format_cell_value(&json!(true)), "true");
    }

    #[test]
    fn test_format_rows_table() {
        let outcome = ExecutionOutcome::Rows {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: rows(json!([
                {"id": 1, "name": "Alice"},
                {"id": 2, "name": null}
            ])),
        };

        assert_eq!(
            format_outcome(&outcome),
            "Query executed successfully. Returned 2 rows.\n\n\
             id | name\n\
             ---+------\n\
             1  | Alice\n\
             2  | NULL\n"
        );
    }

    #[test]
    fn test_format_empty_and_acknowledged() {
        let empty = ExecutionOutcome::Rows {
            columns: vec![],
            rows: vec![],
        };
        assert_eq!(
            format_outcome(&empty),
            "Query executed successfully but returned no rows."
        );

        assert_eq!(
            format_outcome(&ExecutionOutcome::Acknowledged { rows_affected: 1 }),
            "SQL command executed successfully. 1 row affected."
        );
    }

    #[test]
    fn test_long_result_is_cut() {
        let many: Vec<Value> = (0..60).map(|i| json!({ "n": i })).collect();
        let outcome = ExecutionOutcome::Rows {
            columns: vec!["n".to_string()],
            rows: rows(Value::Array(many)),
        };

        let text = format_outcome(&outcome);

        assert!(text.contains("Returned 60 rows"));
        assert!(text.ends_with("... and 10 more rows\n"));
    }
}
