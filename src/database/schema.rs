use crate::database::{DatabaseError, Result};
/// Database schema definitions and migration helpers
use sqlx::SqlitePool;

pub const EXPECTED_TABLES: [&str; 4] = ["metadata", "partido", "ubis", "voto"];

pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    // Locations: one row per mesa, names denormalized
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ubis (
            mesa INTEGER PRIMARY KEY,
            dept_name TEXT NOT NULL,
            muni_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS partido (
            partido_id INTEGER PRIMARY KEY,
            partido_name TEXT UNIQUE NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Registration counts, at most one row per (mesa, tipo)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS metadata (
            id INTEGER PRIMARY KEY,
            mesa INTEGER NOT NULL,
            tipo TEXT NOT NULL,
            padron INTEGER NOT NULL DEFAULT 0,
            validos INTEGER NOT NULL DEFAULT 0,
            nulos INTEGER NOT NULL DEFAULT 0,
            en_blanco INTEGER NOT NULL DEFAULT 0,
            emitidos INTEGER NOT NULL DEFAULT 0,
            UNIQUE(mesa, tipo)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Party votes per (mesa, tipo)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS voto (
            id INTEGER PRIMARY KEY,
            mesa INTEGER NOT NULL,
            tipo TEXT NOT NULL,
            partido_id INTEGER NOT NULL,
            voto INTEGER NOT NULL DEFAULT 0,
            UNIQUE(mesa, tipo, partido_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    let indexes = vec![
        "CREATE INDEX IF NOT EXISTS idx_ubis_dept_muni ON ubis(dept_name, muni_name)",
        "CREATE INDEX IF NOT EXISTS idx_metadata_mesa ON metadata(mesa)",
        "CREATE INDEX IF NOT EXISTS idx_voto_party_mesa ON voto(partido_id, mesa)",
    ];

    for index_sql in indexes {
        sqlx::query(index_sql).execute(pool).await?;
    }

    Ok(())
}

/// Verify database schema integrity
pub async fn verify_schema(pool: &SqlitePool) -> Result<()> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    for expected in &EXPECTED_TABLES {
        if !tables.iter().any(|name| name == expected) {
            return Err(DatabaseError::Integrity(format!(
                "Missing table: {}",
                expected
            )));
        }
    }

    Ok(())
}
