//! Catalogue of the data schema: tables and their columns

use contracts::shared::data_source::{ColumnInfo, SchemaTable};
use sqlx::Row;

use super::pool::DataSource;
use crate::shared::error::AppError;

/// Tables and views of the data schema, sorted by name
pub async fn get_schema_tables(source: &DataSource) -> Result<Vec<SchemaTable>, AppError> {
    let sql = format!(
        "SELECT name FROM \"{}\".sqlite_master \
         WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' \
         ORDER BY name",
        source.schema
    );

    let names: Vec<String> = sqlx::query_scalar(&sql)
        .fetch_all(&source.pool)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(names
        .into_iter()
        .map(|table_name| SchemaTable {
            table_schema: source.schema.to_string(),
            table_name,
        })
        .collect())
}

/// Columns of `table_name` in declaration order.
///
/// An unknown table (or a schema other than the data schema) yields an empty
/// list, the same as an information_schema lookup would.
pub async fn get_table_columns(
    source: &DataSource,
    table_name: &str,
    schema_name: Option<&str>,
) -> Result<Vec<ColumnInfo>, AppError> {
    let schema = schema_name.unwrap_or(source.schema);
    if schema != source.schema {
        return Ok(Vec::new());
    }

    let rows = sqlx::query("SELECT name, type FROM pragma_table_info(?1, ?2) ORDER BY cid")
        .bind(table_name)
        .bind(schema)
        .fetch_all(&source.pool)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let column_name: String = row.try_get("name").map_err(|e| AppError::Internal(e.into()))?;
        let declared: String = row.try_get("type").unwrap_or_default();
        columns.push(ColumnInfo {
            column_name,
            data_type: if declared.is_empty() {
                "ANY".to_string()
            } else {
                declared.to_ascii_lowercase()
            },
        });
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data_source::pool::test_support::TempDataset;

    #[tokio::test]
    async fn lists_demo_tables() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(100).await;

        let tables = get_schema_tables(&source).await.unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.table_name.as_str()).collect();
        assert_eq!(names, vec!["clientes", "ventas"]);
        assert!(tables.iter().all(|t| t.table_schema == "be_exponential"));
    }

    #[tokio::test]
    async fn columns_in_declaration_order_with_types() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(100).await;

        let columns = get_table_columns(&source, "clientes", None).await.unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.column_name.as_str()).collect();
        assert_eq!(names, vec!["id", "nombre", "ciudad", "segmento", "limite_credito"]);
        assert_eq!(columns[0].data_type, "integer");
        assert!(columns[4].is_numeric());
        assert!(!columns[1].is_numeric());
    }

    #[tokio::test]
    async fn unknown_table_or_schema_is_empty() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(100).await;

        assert!(get_table_columns(&source, "nope", None).await.unwrap().is_empty());
        assert!(get_table_columns(&source, "ventas", Some("public"))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            get_table_columns(&source, "ventas", Some("be_exponential"))
                .await
                .unwrap()
                .len(),
            9
        );
    }
}
