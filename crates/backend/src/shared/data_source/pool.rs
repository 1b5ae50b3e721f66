//! Read-only connection pool over the dataset file.
//!
//! Every pooled connection attaches the dataset as schema `be_exponential`
//! and switches to `query_only`, so queries coming from the UI can read but
//! never modify data.

use contracts::shared::widgets::DATA_SCHEMA;
use once_cell::sync::OnceCell;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

static DATA_SOURCE: OnceCell<DataSource> = OnceCell::new();

const POOL_SIZE: u32 = 4;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

pub struct DataSource {
    pub pool: SqlitePool,
    pub schema: &'static str,
    pub max_rows: usize,
    /// Limit for one execute_query call
    pub query_timeout: Duration,
    pub path: PathBuf,
}

impl DataSource {
    /// Open a pool over `path`; the file must already exist
    pub async fn connect(path: &Path, max_rows: usize) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Dataset file not found: {}", path.display());
        }

        let attach_sql = format!("ATTACH DATABASE ?1 AS \"{}\"", DATA_SCHEMA);
        let file = path.to_string_lossy().to_string();

        let pool = SqlitePoolOptions::new()
            .max_connections(POOL_SIZE)
            .after_connect(move |conn, _meta| {
                let attach_sql = attach_sql.clone();
                let file = file.clone();
                Box::pin(async move {
                    sqlx::query(&attach_sql).bind(file).execute(&mut *conn).await?;
                    sqlx::query("PRAGMA query_only = ON").execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect_with(SqliteConnectOptions::new().filename(":memory:"))
            .await?;

        Ok(Self {
            pool,
            schema: DATA_SCHEMA,
            max_rows,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            path: path.to_path_buf(),
        })
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

pub async fn initialize(path: &Path, max_rows: usize, query_timeout: Duration) -> anyhow::Result<()> {
    let source = DataSource::connect(path, max_rows)
        .await?
        .with_query_timeout(query_timeout);
    tracing::info!(
        "Data source attached as \"{}\": {} (max_rows = {}, timeout = {} s)",
        source.schema,
        source.path.display(),
        source.max_rows,
        source.query_timeout.as_secs()
    );
    DATA_SOURCE
        .set(source)
        .map_err(|_| anyhow::anyhow!("Failed to set DATA_SOURCE"))?;
    Ok(())
}

pub fn get_data_source() -> &'static DataSource {
    DATA_SOURCE
        .get()
        .expect("Data source has not been initialized")
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// Temporary dataset file with demo tables, removed on drop
    pub struct TempDataset {
        pub path: PathBuf,
    }

    impl TempDataset {
        pub async fn with_demo_data() -> Self {
            let path = std::env::temp_dir().join(format!("dataset-{}.db", uuid::Uuid::new_v4()));
            crate::shared::data_source::seed::seed_demo_data(&path)
                .await
                .unwrap();
            Self { path }
        }

        pub async fn open(&self, max_rows: usize) -> DataSource {
            DataSource::connect(&self.path, max_rows).await.unwrap()
        }
    }

    impl Drop for TempDataset {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::TempDataset;
    use super::*;

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("definitely-missing-dataset.db");
        assert!(DataSource::connect(&path, 10).await.is_err());
    }

    #[tokio::test]
    async fn attached_schema_is_readable_but_not_writable() {
        let dataset = TempDataset::with_demo_data().await;
        let source = dataset.open(100).await;

        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "be_exponential"."ventas""#)
            .fetch_one(&source.pool)
            .await
            .unwrap();
        assert!(count > 0);

        let write = sqlx::query(r#"DELETE FROM "be_exponential"."ventas""#)
            .execute(&source.pool)
            .await;
        assert!(write.is_err());
    }
}
