use contracts::shared::data_source::QueryRows;
use futures::TryStreamExt;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Executor, Row, TypeInfo, ValueRef};

use super::metadata;
use super::pool::DataSource;
use super::query_guard::{quoted_names, validate_read_only};
use crate::shared::error::AppError;
use crate::shared::format::format_number;

/// Run a read-only query against the data source.
///
/// Columns keep select-list order. Rows are read one by one and reading stops
/// after `max_rows`; `truncated` tells the caller that more were available.
pub async fn execute_query(source: &DataSource, sql: &str) -> Result<QueryRows, AppError> {
    let sql = validate_read_only(sql)?;
    check_identifiers(source, sql).await?;
    let started = std::time::Instant::now();

    let mut conn = source
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let fetched = tokio::time::timeout(
        source.query_timeout,
        fetch_capped(&mut conn, sql, source.max_rows),
    )
    .await;

    let (columns, rows, truncated) = match fetched {
        Ok(result) => result.map_err(map_query_error)?,
        Err(_) => {
            // Соединение ещё занято запросом, в пул его не возвращаем
            drop(conn.detach());
            tracing::warn!(
                "Query timed out after {} s: {}",
                source.query_timeout.as_secs(),
                sql.chars().take(120).collect::<String>()
            );
            return Err(AppError::InvalidQuery(format!(
                "query timed out after {} s",
                source.query_timeout.as_secs()
            )));
        }
    };
    drop(conn);

    let columns = match columns {
        Some(columns) => columns,
        None => describe_columns(source, sql).await,
    };

    tracing::debug!(
        "execute_query: {} rows in {} ms{}",
        format_number(rows.len()),
        started.elapsed().as_millis(),
        if truncated { " (truncated)" } else { "" }
    );
    if truncated {
        tracing::warn!(
            "Query result cut at {} rows: {}",
            format_number(source.max_rows),
            sql.chars().take(120).collect::<String>()
        );
    }

    Ok(QueryRows {
        columns,
        rows,
        truncated,
    })
}

/// Up to `max_rows` decoded rows plus whether another row was available.
/// Column names come from the first row.
async fn fetch_capped(
    conn: &mut SqliteConnection,
    sql: &str,
    max_rows: usize,
) -> Result<(Option<Vec<String>>, Vec<Vec<Value>>, bool), sqlx::Error> {
    let mut stream = sqlx::query(sql).fetch(conn);
    let mut columns = None;
    let mut rows = Vec::new();

    while let Some(row) = stream.try_next().await? {
        if rows.len() == max_rows {
            return Ok((columns, rows, true));
        }
        if columns.is_none() {
            columns = Some(row.columns().iter().map(|c| c.name().to_string()).collect());
        }
        rows.push((0..row.len()).map(|idx| decode_cell(&row, idx)).collect());
    }

    Ok((columns, rows, false))
}

/// Bare double-quoted names must resolve; SQLite would otherwise read an
/// unknown `"name"` as the literal `'name'` and return it as data.
async fn check_identifiers(source: &DataSource, sql: &str) -> Result<(), AppError> {
    let names = quoted_names(sql);
    if names.references.is_empty() {
        return Ok(());
    }

    let mut known: Vec<String> = vec![source.schema.to_ascii_lowercase()];
    known.extend(names.definitions.iter().map(|n| n.to_lowercase()));

    let mentioned: Vec<String> = names.all.iter().map(|n| n.to_lowercase()).collect();
    for table in metadata::get_schema_tables(source).await? {
        let table_name = table.table_name.to_lowercase();
        if !mentioned.contains(&table_name) {
            continue;
        }
        for column in metadata::get_table_columns(source, &table.table_name, None).await? {
            known.push(column.column_name.to_lowercase());
        }
        known.push(table_name);
    }

    match names
        .references
        .iter()
        .find(|name| !known.contains(&name.to_lowercase()))
    {
        Some(unknown) => Err(AppError::InvalidQuery(format!("no such column: {}", unknown))),
        None => Ok(()),
    }
}

/// Column names of an empty result
async fn describe_columns(source: &DataSource, sql: &str) -> Vec<String> {
    match (&source.pool).describe(sql).await {
        Ok(described) => described
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect(),
        Err(e) => {
            tracing::debug!("describe failed: {}", e);
            Vec::new()
        }
    }
}

/// Ошибки самого запроса (синтаксис, неизвестная колонка) отдаём как 400
fn map_query_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(db_err) => AppError::InvalidQuery(db_err.message().to_string()),
        other => AppError::Internal(other.into()),
    }
}

/// Convert one cell by its runtime storage class
fn decode_cell(row: &SqliteRow, idx: usize) -> Value {
    let type_name = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "INTEGER" => row
            .try_get_unchecked::<i64, _>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "REAL" => row
            .try_get_unchecked::<f64, _>(idx)
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(idx)
            .map(|bytes| Value::String(format!("<{} bytes>", bytes.len())))
            .unwrap_or(Value::Null),
        _ => row
            .try_get_unchecked::<String, _>(idx)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data_source::pool::test_support::TempDataset;
    use contracts::shared::widgets::{build_widget_query, Aggregation, WidgetConfig};
    use serde_json::json;

    #[tokio::test]
    async fn runs_builder_query_with_ordered_columns() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(5000).await;

        let config = WidgetConfig {
            x_axis: Some("region".into()),
            y_axis_aggregation: Some(Aggregation::Count),
            ..Default::default()
        };
        let sql = build_widget_query("bar_chart", "ventas", &config);
        let result = execute_query(&source, &sql).await.unwrap();

        assert_eq!(result.columns, vec!["region".to_string(), "value".to_string()]);
        assert_eq!(result.rows.len(), 5);
        assert_eq!(result.rows[0][0], json!("Centro"));
        let total: i64 = result.rows.iter().map(|r| r[1].as_i64().unwrap()).sum();
        assert_eq!(total, 480);
        assert!(!result.truncated);
    }

    #[tokio::test]
    async fn kpi_returns_a_single_number() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(5000).await;

        let result = execute_query(&source, r#"SELECT MAX("cantidad") FROM "be_exponential"."ventas""#)
            .await
            .unwrap();
        assert_eq!(result.rows, vec![vec![json!(20)]]);
    }

    #[tokio::test]
    async fn nulls_and_reals_are_decoded() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(5000).await;

        let result = execute_query(
            &source,
            r#"SELECT "id", "limite_credito" FROM "be_exponential"."clientes" WHERE "id" IN (1, 2) ORDER BY "id""#,
        )
        .await
        .unwrap();
        assert_eq!(result.rows[0], vec![json!(1), Value::Null]);
        assert_eq!(result.rows[1], vec![json!(2), json!(1250.0)]);
    }

    #[tokio::test]
    async fn result_is_capped_at_max_rows() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(10).await;

        let result = execute_query(&source, r#"SELECT "id" FROM "be_exponential"."ventas""#)
            .await
            .unwrap();
        assert_eq!(result.rows.len(), 10);
        assert!(result.truncated);
    }

    #[tokio::test]
    async fn empty_result_still_has_columns() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(100).await;

        let result = execute_query(
            &source,
            r#"SELECT "region", "monto" FROM "be_exponential"."ventas" WHERE 1 = 0"#,
        )
        .await
        .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.columns, vec!["region".to_string(), "monto".to_string()]);
    }

    #[tokio::test]
    async fn bad_sql_is_an_invalid_query_not_internal() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(100).await;

        let err = execute_query(&source, r#"SELECT "nope" FROM "be_exponential"."ventas""#)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidQuery(_)));

        let err = execute_query(&source, "DROP TABLE ventas").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn misspelled_builder_columns_are_rejected() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(100).await;

        let kpi = WidgetConfig {
            column: Some("montoo".into()),
            aggregation: Some(Aggregation::Sum),
            ..Default::default()
        };
        let err = execute_query(&source, &build_widget_query("kpi", "ventas", &kpi))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidQuery(ref m) if m.contains("montoo")));

        let chart = WidgetConfig {
            x_axis: Some("regionn".into()),
            y_axis_aggregation: Some(Aggregation::Count),
            ..Default::default()
        };
        let err = execute_query(&source, &build_widget_query("bar_chart", "ventas", &chart))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidQuery(ref m) if m.contains("regionn")));

        // колонка есть, но в другой таблице
        let foreign = WidgetConfig {
            column: Some("limite_credito".into()),
            aggregation: Some(Aggregation::Max),
            ..Default::default()
        };
        assert!(execute_query(&source, &build_widget_query("kpi", "ventas", &foreign))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn aliases_and_case_are_resolved() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(100).await;

        let result = execute_query(
            &source,
            r#"SELECT "Region" AS "zona", COUNT(*) AS "n" FROM "be_exponential"."ventas" GROUP BY "zona" ORDER BY "n" DESC"#,
        )
        .await
        .unwrap();
        assert_eq!(result.columns, vec!["zona".to_string(), "n".to_string()]);
        assert_eq!(result.rows.len(), 5);
    }

    #[tokio::test]
    async fn unbounded_result_stops_at_max_rows() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(10).await;

        let started = std::time::Instant::now();
        let result = execute_query(
            &source,
            "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n) SELECT i FROM n",
        )
        .await
        .unwrap();
        assert_eq!(result.rows.len(), 10);
        assert_eq!(result.rows[9], vec![json!(10)]);
        assert!(result.truncated);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[tokio::test]
    async fn slow_query_times_out() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset
            .open(10)
            .await
            .with_query_timeout(std::time::Duration::from_millis(50));

        let err = execute_query(
            &source,
            "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < 50000000) \
             SELECT COUNT(*) FROM n",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidQuery(ref m) if m.contains("timed out")));
    }
}
