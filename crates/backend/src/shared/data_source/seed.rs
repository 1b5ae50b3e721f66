//! Demo dataset so that a fresh install has something to chart

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use std::path::Path;

const REGIONS: &[&str] = &["Norte", "Sur", "Este", "Oeste", "Centro"];
const CATEGORIES: &[(&str, &[&str])] = &[
    ("Bebidas", &["Agua", "Jugo", "Refresco"]),
    ("Lácteos", &["Leche", "Yogur", "Queso"]),
    ("Panadería", &["Pan", "Galletas"]),
    ("Limpieza", &["Jabón", "Detergente"]),
];
const CITIES: &[&str] = &["Lima", "Quito", "Bogotá", "Santiago", "Montevideo", "Asunción"];
const SEGMENTS: &[&str] = &["Minorista", "Mayorista", "Corporativo"];

const SALES_ROWS: i64 = 480;
const CUSTOMER_ROWS: i64 = 60;

/// Create `ventas` and `clientes` in the dataset file if they are missing
pub async fn seed_demo_data(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options).await?;

    if !has_table(&mut conn, "ventas").await? {
        tracing::info!("Seeding demo table ventas ({} rows)", SALES_ROWS);
        seed_sales(&mut conn).await?;
    }
    if !has_table(&mut conn, "clientes").await? {
        tracing::info!("Seeding demo table clientes ({} rows)", CUSTOMER_ROWS);
        seed_customers(&mut conn).await?;
    }

    conn.close().await?;
    Ok(())
}

async fn has_table(conn: &mut SqliteConnection, table_name: &str) -> anyhow::Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(1) FROM sqlite_master WHERE type='table' AND name = ?1",
    )
    .bind(table_name)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

async fn seed_sales(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    let mut tx = conn.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE ventas (
            id INTEGER PRIMARY KEY,
            fecha TEXT NOT NULL,
            mes TEXT NOT NULL,
            region TEXT NOT NULL,
            categoria TEXT NOT NULL,
            producto TEXT NOT NULL,
            cantidad INTEGER NOT NULL,
            monto REAL NOT NULL,
            cliente_id INTEGER
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    for i in 0..SALES_ROWS {
        let month = i % 12 + 1;
        let day = i % 28 + 1;
        let region = REGIONS[(i as usize * 7) % REGIONS.len()];
        let (category, products) = CATEGORIES[(i as usize * 3) % CATEGORIES.len()];
        let product = products[(i as usize) % products.len()];
        let quantity = (i * 13) % 20 + 1;
        let price = 2.5 + ((i * 37) % 90) as f64 / 10.0;
        let amount = (quantity as f64 * price * 100.0).round() / 100.0;

        sqlx::query(
            "INSERT INTO ventas (id, fecha, mes, region, categoria, producto, cantidad, monto, cliente_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(i + 1)
        .bind(format!("2024-{:02}-{:02}", month, day))
        .bind(format!("2024-{:02}", month))
        .bind(region)
        .bind(category)
        .bind(product)
        .bind(quantity)
        .bind(amount)
        .bind(i % CUSTOMER_ROWS + 1)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

async fn seed_customers(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    let mut tx = conn.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE clientes (
            id INTEGER PRIMARY KEY,
            nombre TEXT NOT NULL,
            ciudad TEXT NOT NULL,
            segmento TEXT NOT NULL,
            limite_credito REAL
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    for i in 0..CUSTOMER_ROWS {
        let credit = if i % 5 == 0 { None } else { Some(1000.0 + (i * 250) as f64) };
        sqlx::query(
            "INSERT INTO clientes (id, nombre, ciudad, segmento, limite_credito)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(i + 1)
        .bind(format!("Cliente {:03}", i + 1))
        .bind(CITIES[(i as usize) % CITIES.len()])
        .bind(SEGMENTS[(i as usize * 5) % SEGMENTS.len()])
        .bind(credit)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_twice_keeps_row_counts() {
        let path = std::env::temp_dir().join(format!("seed-{}.db", uuid::Uuid::new_v4()));
        seed_demo_data(&path).await.unwrap();
        seed_demo_data(&path).await.unwrap();

        let options = SqliteConnectOptions::new().filename(&path);
        let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
        let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ventas")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        let customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clientes")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(sales, SALES_ROWS);
        assert_eq!(customers, CUSTOMER_ROWS);
    }
}
