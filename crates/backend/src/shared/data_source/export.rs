use contracts::shared::data_source::QueryRows;
use contracts::shared::widgets::result_shape::cell_to_text;

/// Query result as CSV (header row + data rows, comma separated)
pub fn rows_to_csv(rows: &QueryRows) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(&rows.columns)?;
    for row in &rows.rows {
        writer.write_record(row.iter().map(cell_to_text))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// File name for a CSV download: letters, digits, `-` and `_` only
pub fn csv_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "widget.csv".to_string()
    } else {
        format!("{}.csv", cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn writes_header_and_quotes_when_needed() {
        let rows = QueryRows {
            columns: vec!["region".into(), "value".into()],
            rows: vec![
                vec![json!("Norte, alto"), json!(10)],
                vec![Value::Null, json!(2.5)],
            ],
            truncated: false,
        };
        let csv = rows_to_csv(&rows).unwrap();
        assert_eq!(csv, "region,value\n\"Norte, alto\",10\n,2.5\n");
    }

    #[test]
    fn file_name_is_sanitized() {
        assert_eq!(csv_file_name("Ventas por región"), "Ventas_por_regi_n.csv");
        assert_eq!(csv_file_name("///"), "widget.csv");
    }
}
