//! Mapping of tabular query results into the shapes the renderers draw.
//!
//! Columns are addressed by position in [`QueryRows::columns`], which the
//! server fills in select-list order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::data_source::QueryRows;

/// One labelled value of a bar/line/donut chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Donut chart data with the keys taken from the result columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutData {
    pub name_key: String,
    pub value_key: String,
    pub slices: Vec<SeriesPoint>,
}

impl DonutData {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Share of each slice in percent; all zeros when the total is zero
    pub fn percentages(&self) -> Vec<f64> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| if total == 0.0 { 0.0 } else { s.value / total * 100.0 })
            .collect()
    }
}

/// Numeric value of a cell (numbers and numeric strings)
pub fn cell_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Display text of a cell
pub fn cell_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First cell of the first row (KPI, gauge)
pub fn scalar(rows: &QueryRows) -> Option<f64> {
    rows.rows.first()?.first().and_then(cell_to_f64)
}

/// Column 0 as label, column 1 as value (bar/line)
pub fn series(rows: &QueryRows) -> Vec<SeriesPoint> {
    rows.rows
        .iter()
        .filter_map(|row| {
            let label = row.first().map(cell_to_text)?;
            let value = row.get(1).and_then(cell_to_f64).unwrap_or(0.0);
            Some(SeriesPoint { label, value })
        })
        .collect()
}

/// Donut slices; `None` when the result does not have two columns
pub fn donut(rows: &QueryRows) -> Option<DonutData> {
    let name_key = rows.columns.first()?.clone();
    let value_key = rows.columns.get(1)?.clone();
    Some(DonutData {
        name_key,
        value_key,
        slices: series(rows),
    })
}

/// Every cell as display text (data table)
pub fn table_cells(rows: &QueryRows) -> Vec<Vec<String>> {
    rows.rows
        .iter()
        .map(|row| row.iter().map(cell_to_text).collect())
        .collect()
}

/// Position of `value` between `min` and `max` as 0.0..=1.0
pub fn gauge_fraction(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Largest value of a series, used to scale bars (at least 1.0 to avoid division by zero)
pub fn series_max(points: &[SeriesPoint]) -> f64 {
    points
        .iter()
        .map(|p| p.value.abs())
        .fold(0.0_f64, f64::max)
        .max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(columns: &[&str], data: Vec<Vec<Value>>) -> QueryRows {
        QueryRows {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: data,
            truncated: false,
        }
    }

    #[test]
    fn scalar_reads_first_cell() {
        let r = rows(&["SUM(\"monto\")"], vec![vec![json!(1250.5)]]);
        assert_eq!(scalar(&r), Some(1250.5));

        let text = rows(&["x"], vec![vec![json!("42")]]);
        assert_eq!(scalar(&text), Some(42.0));

        assert_eq!(scalar(&QueryRows::default()), None);
        let null = rows(&["x"], vec![vec![Value::Null]]);
        assert_eq!(scalar(&null), None);
    }

    #[test]
    fn series_is_positional_not_by_name() {
        let r = rows(
            &["region", "value"],
            vec![
                vec![json!("Norte"), json!(10)],
                vec![json!("Sur"), Value::Null],
                vec![json!(2024), json!("7.5")],
            ],
        );
        let s = series(&r);
        assert_eq!(s.len(), 3);
        assert_eq!(s[0], SeriesPoint { label: "Norte".into(), value: 10.0 });
        assert_eq!(s[1].value, 0.0);
        assert_eq!(s[2].label, "2024");
        assert_eq!(s[2].value, 7.5);
    }

    #[test]
    fn donut_keys_come_from_column_order() {
        let r = rows(
            &["categoria", "monto"],
            vec![vec![json!("A"), json!(30)], vec![json!("B"), json!(10)]],
        );
        let d = donut(&r).unwrap();
        assert_eq!(d.name_key, "categoria");
        assert_eq!(d.value_key, "monto");
        assert_eq!(d.total(), 40.0);
        assert_eq!(d.percentages(), vec![75.0, 25.0]);

        assert!(donut(&rows(&["only"], vec![])).is_none());
    }

    #[test]
    fn zero_total_donut_has_zero_shares() {
        let r = rows(&["c", "v"], vec![vec![json!("A"), json!(0)]]);
        assert_eq!(donut(&r).unwrap().percentages(), vec![0.0]);
    }

    #[test]
    fn table_cells_render_text() {
        let r = rows(&["a", "b"], vec![vec![json!("x"), Value::Null], vec![json!(1), json!(true)]]);
        assert_eq!(
            table_cells(&r),
            vec![vec!["x".to_string(), String::new()], vec!["1".to_string(), "true".to_string()]]
        );
    }

    #[test]
    fn gauge_fraction_is_clamped() {
        assert_eq!(gauge_fraction(50.0, 0.0, 100.0), 0.5);
        assert_eq!(gauge_fraction(-5.0, 0.0, 100.0), 0.0);
        assert_eq!(gauge_fraction(500.0, 0.0, 100.0), 1.0);
        assert_eq!(gauge_fraction(1.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn series_max_never_below_one() {
        assert_eq!(series_max(&[]), 1.0);
        let pts = vec![
            SeriesPoint { label: "a".into(), value: -30.0 },
            SeriesPoint { label: "b".into(), value: 20.0 },
        ];
        assert_eq!(series_max(&pts), 30.0);
    }
}
