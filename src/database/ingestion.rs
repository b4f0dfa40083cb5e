/// Bulk loading of an election snapshot into the results store
use crate::database::{DatabaseError, ResultsDatabase, Result};
use crate::model::{BallotCategory, MesaId, PartyId};
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Reference and count data for one election, as exported by the
/// scrutiny system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub locations: Vec<LocationRecord>,
    #[serde(default)]
    pub parties: Vec<PartyRecord>,
    #[serde(default)]
    pub registrations: Vec<RegistrationRecord>,
    #[serde(default)]
    pub votes: Vec<VoteRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub mesa: MesaId,
    pub dept_name: String,
    pub muni_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRecord {
    pub partido_id: PartyId,
    pub partido_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub mesa: MesaId,
    pub tipo: BallotCategory,
    pub padron: i64,
    pub validos: i64,
    #[serde(default)]
    pub nulos: i64,
    #[serde(default)]
    pub en_blanco: i64,
    pub emitidos: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub mesa: MesaId,
    pub tipo: BallotCategory,
    pub partido_id: PartyId,
    pub voto: i64,
}

impl LocationRecord {
    pub fn new(mesa: MesaId, dept_name: &str, muni_name: &str) -> Self {
        Self {
            mesa,
            dept_name: dept_name.to_string(),
            muni_name: muni_name.to_string(),
        }
    }
}

impl PartyRecord {
    pub fn new(partido_id: PartyId, partido_name: &str) -> Self {
        Self {
            partido_id,
            partido_name: partido_name.to_string(),
        }
    }
}

impl RegistrationRecord {
    pub fn new(mesa: MesaId, tipo: BallotCategory, padron: i64, validos: i64, emitidos: i64) -> Self {
        Self {
            mesa,
            tipo,
            padron,
            validos,
            nulos: 0,
            en_blanco: 0,
            emitidos,
        }
    }

    pub fn with_invalid(mut self, nulos: i64, en_blanco: i64) -> Self {
        self.nulos = nulos;
        self.en_blanco = en_blanco;
        self
    }
}

impl VoteRecord {
    pub fn new(mesa: MesaId, tipo: BallotCategory, partido_id: PartyId, voto: i64) -> Self {
        Self {
            mesa,
            tipo,
            partido_id,
            voto,
        }
    }
}

impl Snapshot {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&contents)?;
        Ok(snapshot)
    }

    /// Reject data the store could not represent: duplicated keys and
    /// negative counts.
    pub fn validate(&self) -> Result<()> {
        let mut mesas = HashSet::new();
        for location in &self.locations {
            if !mesas.insert(location.mesa) {
                return Err(DatabaseError::Integrity(format!(
                    "Duplicate mesa: {}",
                    location.mesa
                )));
            }
        }

        let mut party_names = HashSet::new();
        for party in &self.parties {
            if !party_names.insert(party.partido_name.as_str()) {
                return Err(DatabaseError::Integrity(format!(
                    "Duplicate party name: {}",
                    party.partido_name
                )));
            }
        }

        for record in &self.registrations {
            let counts = [
                record.padron,
                record.validos,
                record.nulos,
                record.en_blanco,
                record.emitidos,
            ];
            if counts.iter().any(|count| *count < 0) {
                return Err(DatabaseError::Integrity(format!(
                    "Negative registration count for mesa {} ({})",
                    record.mesa, record.tipo
                )));
            }
        }

        if let Some(record) = self.votes.iter().find(|record| record.voto < 0) {
            return Err(DatabaseError::Integrity(format!(
                "Negative vote count for mesa {} ({})",
                record.mesa, record.tipo
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionSummary {
    pub locations: usize,
    pub parties: usize,
    pub registrations: usize,
    pub votes: usize,
    pub total_duration_ms: u64,
}

impl IngestionSummary {
    pub fn total_rows(&self) -> usize {
        self.locations + self.parties + self.registrations + self.votes
    }
}

pub struct SnapshotIngester {
    db: ResultsDatabase,
}

impl SnapshotIngester {
    pub fn new(db: ResultsDatabase) -> Self {
        Self { db }
    }

    /// Load a snapshot in a single transaction. With `replace`, all existing
    /// rows are removed first; otherwise conflicting keys abort the load.
    pub async fn ingest(&self, snapshot: &Snapshot, replace: bool) -> Result<IngestionSummary> {
        snapshot.validate()?;

        let start = Instant::now();
        let mut tx = self.db.pool().begin().await?;

        if replace {
            for table in ["voto", "metadata", "partido", "ubis"] {
                sqlx::query(&format!("DELETE FROM {}", table))
                    .execute(&mut *tx)
                    .await?;
            }
        }

        for location in &snapshot.locations {
            sqlx::query("INSERT INTO ubis (mesa, dept_name, muni_name) VALUES (?, ?, ?)")
                .bind(location.mesa)
                .bind(&location.dept_name)
                .bind(&location.muni_name)
                .execute(&mut *tx)
                .await?;
        }

        for party in &snapshot.parties {
            sqlx::query("INSERT INTO partido (partido_id, partido_name) VALUES (?, ?)")
                .bind(party.partido_id)
                .bind(&party.partido_name)
                .execute(&mut *tx)
                .await?;
        }

        for record in &snapshot.registrations {
            sqlx::query(
                r#"
                INSERT INTO metadata (mesa, tipo, padron, validos, nulos, en_blanco, emitidos)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.mesa)
            .bind(record.tipo.tipo())
            .bind(record.padron)
            .bind(record.validos)
            .bind(record.nulos)
            .bind(record.en_blanco)
            .bind(record.emitidos)
            .execute(&mut *tx)
            .await?;
        }

        for record in &snapshot.votes {
            sqlx::query("INSERT INTO voto (mesa, tipo, partido_id, voto) VALUES (?, ?, ?, ?)")
                .bind(record.mesa)
                .bind(record.tipo.tipo())
                .bind(record.partido_id)
                .bind(record.voto)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let summary = IngestionSummary {
            locations: snapshot.locations.len(),
            parties: snapshot.parties.len(),
            registrations: snapshot.registrations.len(),
            votes: snapshot.votes.len(),
            total_duration_ms: start.elapsed().as_millis() as u64,
        };

        log::info!(
            "Loaded {} rows in {} ms",
            summary.total_rows(),
            summary.total_duration_ms
        );

        Ok(summary)
    }
}
