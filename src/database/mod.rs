pub mod ingestion;
pub mod schema;

use crate::config::DatabaseConfig;
use crate::model::{MesaId, PartyId};
use crate::results::store::ResultsStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Data integrity error: {0}")]
    Integrity(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Read side of the election store: locations (`ubis`), parties
/// (`partido`), registration counts (`metadata`) and party votes (`voto`).
#[derive(Clone)]
pub struct ResultsDatabase {
    pool: SqlitePool,
}

impl ResultsDatabase {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options =
            SqliteConnectOptions::from_str(&config.url)?.create_if_missing(config.create_if_missing);

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        if config.is_in_memory() {
            // Every connection to `:memory:` is a separate database, so pin one
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options.connect_with(options).await?;
        log::debug!(
            "Connected to {} (max {} connections)",
            config.url,
            config.max_connections
        );

        Ok(Self { pool })
    }

    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(&DatabaseConfig::new(database_url)).await
    }

    pub async fn create_in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Mesas located in a (department, municipality) pair, ascending.
    pub async fn get_mesas(&self, dept_name: &str, muni_name: &str) -> Result<Vec<MesaId>> {
        let mesas = sqlx::query_scalar::<_, MesaId>(
            r#"
            SELECT DISTINCT mesa
            FROM ubis
            WHERE dept_name = ? AND muni_name = ?
            ORDER BY mesa
            "#,
        )
        .bind(dept_name)
        .bind(muni_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(mesas)
    }

    /// Get party ID by its display name
    pub async fn get_party_id(&self, partido_name: &str) -> Result<Option<PartyId>> {
        let party_id = sqlx::query_scalar::<_, PartyId>(
            r#"
            SELECT partido_id
            FROM partido
            WHERE partido_name = ?
            "#,
        )
        .bind(partido_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(party_id)
    }

    /// Registration sums per tipo over a set of mesas.
    ///
    /// The mesa set is bound once as a JSON array, so the statement is the
    /// same whatever the size of the set. Tipos without rows are absent.
    pub async fn get_registration_totals(&self, mesas: &[MesaId]) -> Result<Vec<RegistrationTotals>> {
        let mesa_set = serde_json::to_string(mesas)?;

        let totals = sqlx::query_as::<_, RegistrationTotals>(
            r#"
            SELECT tipo,
                   COALESCE(SUM(padron), 0)   AS padron,
                   COALESCE(SUM(validos), 0)  AS validos,
                   COALESCE(SUM(emitidos), 0) AS emitidos
            FROM metadata
            WHERE mesa IN (SELECT value FROM json_each(?))
            GROUP BY tipo
            ORDER BY tipo
            "#,
        )
        .bind(mesa_set)
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }

    /// Votes for one party per tipo over a set of mesas.
    pub async fn get_party_vote_totals(
        &self,
        mesas: &[MesaId],
        partido_id: PartyId,
    ) -> Result<Vec<VoteTotals>> {
        let mesa_set = serde_json::to_string(mesas)?;

        let totals = sqlx::query_as::<_, VoteTotals>(
            r#"
            SELECT tipo, COALESCE(SUM(voto), 0) AS votos
            FROM voto
            WHERE mesa IN (SELECT value FROM json_each(?)) AND partido_id = ?
            GROUP BY tipo
            ORDER BY tipo
            "#,
        )
        .bind(mesa_set)
        .bind(partido_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }

    pub async fn get_departments(&self) -> Result<Vec<String>> {
        let departments = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT dept_name
            FROM ubis
            WHERE dept_name IS NOT NULL AND dept_name <> ''
            ORDER BY dept_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(departments)
    }

    pub async fn get_municipalities(&self, dept_name: &str) -> Result<Vec<String>> {
        let municipalities = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT muni_name
            FROM ubis
            WHERE dept_name = ?
            ORDER BY muni_name
            "#,
        )
        .bind(dept_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(municipalities)
    }

    pub async fn get_parties(&self) -> Result<Vec<String>> {
        let parties = sqlx::query_scalar::<_, String>(
            r#"
            SELECT partido_name
            FROM partido
            WHERE partido_name IS NOT NULL AND partido_name <> ''
            ORDER BY partido_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(parties)
    }
}

impl ResultsStore for ResultsDatabase {
    async fn mesas_for(&self, department: &str, municipality: &str) -> Result<Vec<MesaId>> {
        self.get_mesas(department, municipality).await
    }

    async fn party_id_for(&self, name: &str) -> Result<Option<PartyId>> {
        self.get_party_id(name).await
    }

    async fn registration_totals(&self, mesas: &[MesaId]) -> Result<Vec<RegistrationTotals>> {
        self.get_registration_totals(mesas).await
    }

    async fn party_vote_totals(&self, mesas: &[MesaId], party_id: PartyId) -> Result<Vec<VoteTotals>> {
        self.get_party_vote_totals(mesas, party_id).await
    }

    async fn departments(&self) -> Result<Vec<String>> {
        self.get_departments().await
    }

    async fn municipalities(&self, department: &str) -> Result<Vec<String>> {
        self.get_municipalities(department).await
    }

    async fn parties(&self) -> Result<Vec<String>> {
        self.get_parties().await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RegistrationTotals {
    pub tipo: String,
    pub padron: i64,
    pub validos: i64,
    pub emitidos: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct VoteTotals {
    pub tipo: String,
    pub votos: i64,
}
