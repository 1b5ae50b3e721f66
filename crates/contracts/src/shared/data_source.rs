//! Data source RPC contracts: catalogue metadata and query execution

use serde::{Deserialize, Serialize};

/// Table of the data schema (`get_schema_tables`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaTable {
    pub table_schema: String,
    pub table_name: String,
}

/// Column of a data table (`get_table_columns`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
}

impl ColumnInfo {
    /// Whether the declared type is numeric (SQLite affinity rules plus common PostgreSQL names)
    pub fn is_numeric(&self) -> bool {
        let t = self.data_type.to_ascii_lowercase();
        ["int", "real", "floa", "doub", "numeric", "decimal", "money"]
            .iter()
            .any(|needle| t.contains(needle))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteQueryRequest {
    pub p_query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTableColumnsRequest {
    pub p_table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_schema_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetSchemaTablesRequest {}

/// Tabular query result with explicit column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Set when the result was cut at the server row limit
    #[serde(default)]
    pub truncated: bool,
}

impl QueryRows {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(t: &str) -> ColumnInfo {
        ColumnInfo {
            column_name: "c".into(),
            data_type: t.into(),
        }
    }

    #[test]
    fn numeric_type_detection() {
        for t in ["INTEGER", "REAL", "NUMERIC", "DECIMAL(10,2)", "double precision", "bigint", "FLOAT"] {
            assert!(col(t).is_numeric(), "{t}");
        }
        for t in ["TEXT", "VARCHAR(20)", "date", "BLOB", ""] {
            assert!(!col(t).is_numeric(), "{t}");
        }
    }

    #[test]
    fn schema_tables_request_accepts_empty_body() {
        let req: GetSchemaTablesRequest = serde_json::from_str("{}").unwrap();
        let _ = req;
        let cols: GetTableColumnsRequest =
            serde_json::from_str(r#"{"p_table_name": "ventas"}"#).unwrap();
        assert_eq!(cols.p_schema_name, None);
    }
}
