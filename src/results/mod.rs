use crate::database::DatabaseError;
use instant::Instant;
use log::{debug, info};

pub mod aggregate;
pub mod composite;
pub mod ratios;
pub mod report;
pub mod resolve;
pub mod store;

use report::{BallotResults, ResultsReport};
use store::ResultsStore;

#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    #[error("Missing required parameter: {field}")]
    Validation { field: &'static str },
    #[error("Party not found: {0}")]
    PartyNotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub type ResultsResult<T> = std::result::Result<T, ResultsError>;

/// A validated (department, municipality, party) selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsQuery {
    department: String,
    municipality: String,
    party: String,
}

impl ResultsQuery {
    /// Surrounding whitespace is dropped; a value that is then empty is a
    /// validation error.
    pub fn new(department: &str, municipality: &str, party: &str) -> ResultsResult<Self> {
        Ok(Self {
            department: required("department", department)?,
            municipality: required("municipality", municipality)?,
            party: required("party", party)?,
        })
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn municipality(&self) -> &str {
        &self.municipality
    }

    pub fn party(&self) -> &str {
        &self.party
    }
}

fn required(field: &'static str, value: &str) -> ResultsResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(ResultsError::Validation { field })
    } else {
        Ok(value.to_string())
    }
}

/// Computes per-ballot results for a selection. Holds nothing but the
/// store handle, so one engine can serve any number of concurrent queries.
pub struct ResultsEngine<S> {
    store: S,
}

impl<S: ResultsStore> ResultsEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn compute(&self, query: &ResultsQuery) -> ResultsResult<ResultsReport> {
        let start = Instant::now();

        let mesas =
            resolve::resolve_locations(&self.store, query.department(), query.municipality())
                .await?;
        let party_id = resolve::resolve_party(&self.store, query.party()).await?;

        if mesas.is_empty() {
            info!(
                "No mesas for {} / {}, reporting zero results",
                query.department(),
                query.municipality()
            );
            return Ok(ResultsReport::new(query, BallotResults::zeroed()));
        }

        let per_category = aggregate::aggregate(&self.store, &mesas, party_id).await?;
        let report = ResultsReport::new(query, BallotResults::from_totals(&per_category));

        debug!(
            "Computed results for {} / {} / {} in {} ms",
            query.department(),
            query.municipality(),
            query.party(),
            start.elapsed().as_millis()
        );

        Ok(report)
    }

    pub async fn departments(&self) -> ResultsResult<Vec<String>> {
        Ok(self.store.departments().await?)
    }

    /// A blank department lists nothing.
    pub async fn municipalities(&self, department: &str) -> ResultsResult<Vec<String>> {
        let department = department.trim();
        if department.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.municipalities(department).await?)
    }

    pub async fn parties(&self) -> ResultsResult<Vec<String>> {
        Ok(self.store.parties().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ingestion::{
        LocationRecord, PartyRecord, RegistrationRecord, Snapshot, SnapshotIngester, VoteRecord,
    };
    use crate::database::{schema, RegistrationTotals, ResultsDatabase};
    use crate::model::BallotCategory;
    use super::store::memory::MemoryStore;

    fn election() -> Snapshot {
        let registrations = vec![
            RegistrationRecord::new(101, BallotCategory::President, 300, 290, 295),
            RegistrationRecord::new(102, BallotCategory::President, 200, 190, 195),
            RegistrationRecord::new(101, BallotCategory::Municipal, 300, 270, 280).with_invalid(6, 4),
            RegistrationRecord::new(102, BallotCategory::Municipal, 200, 180, 190),
            RegistrationRecord::new(101, BallotCategory::NationalDeputies, 300, 250, 280),
            RegistrationRecord::new(102, BallotCategory::DistrictDeputies, 200, 170, 185),
            RegistrationRecord::new(102, BallotCategory::CentralAmericanParliament, 200, 160, 180),
            // Another municipality
            RegistrationRecord::new(201, BallotCategory::President, 900, 850, 880),
        ];

        Snapshot {
            locations: vec![
                LocationRecord::new(101, "Atlantida", "La Ceiba"),
                LocationRecord::new(102, "Atlantida", "La Ceiba"),
                LocationRecord::new(201, "Atlantida", "Tela"),
            ],
            parties: vec![
                PartyRecord::new(1, "Partido Azul"),
                PartyRecord::new(2, "Partido Rojo"),
            ],
            registrations,
            votes: vec![
                VoteRecord::new(101, BallotCategory::President, 1, 300),
                VoteRecord::new(102, BallotCategory::President, 1, 100),
                VoteRecord::new(101, BallotCategory::President, 2, 120),
                VoteRecord::new(101, BallotCategory::Municipal, 1, 150),
                VoteRecord::new(101, BallotCategory::NationalDeputies, 1, 80),
                // Votes without any registration row for the category
                VoteRecord::new(101, BallotCategory::DistrictDeputies, 1, 12),
                VoteRecord::new(201, BallotCategory::President, 1, 700),
            ],
        }
    }

    async fn sqlite_engine(snapshot: &Snapshot) -> ResultsEngine<ResultsDatabase> {
        let db = ResultsDatabase::create_in_memory().await.unwrap();
        schema::create_schema(db.pool()).await.unwrap();
        SnapshotIngester::new(db.clone())
            .ingest(snapshot, false)
            .await
            .unwrap();
        ResultsEngine::new(db)
    }

    fn query(department: &str, municipality: &str, party: &str) -> ResultsQuery {
        ResultsQuery::new(department, municipality, party).unwrap()
    }

    #[test]
    fn query_requires_every_field() {
        assert!(matches!(
            ResultsQuery::new("", "La Ceiba", "Partido Azul"),
            Err(ResultsError::Validation { field: "department" })
        ));
        assert!(matches!(
            ResultsQuery::new("Atlantida", "   ", "Partido Azul"),
            Err(ResultsError::Validation { field: "municipality" })
        ));
        assert!(matches!(
            ResultsQuery::new("Atlantida", "La Ceiba", ""),
            Err(ResultsError::Validation { field: "party" })
        ));

        let trimmed = ResultsQuery::new(" Atlantida ", "La Ceiba", "Partido Azul\n").unwrap();
        assert_eq!(trimmed.department(), "Atlantida");
        assert_eq!(trimmed.party(), "Partido Azul");
    }

    #[tokio::test]
    async fn presidential_totals_for_two_mesas() {
        let engine = sqlite_engine(&election()).await;
        let report = engine
            .compute(&query("Atlantida", "La Ceiba", "Partido Azul"))
            .await
            .unwrap();

        let pres = report.results.president;
        assert_eq!(pres.empadronados, 500);
        assert_eq!(pres.votos_totales, 480);
        assert_eq!(pres.votos_recibidos, 400);
        assert_eq!(pres.participacion, 98.0);
        assert!((pres.eficiencia - 97.96).abs() < 0.005);

        assert_eq!(report.department, "Atlantida");
        assert_eq!(report.municipality, "La Ceiba");
        assert_eq!(report.party, "Partido Azul");
    }

    #[tokio::test]
    async fn votes_without_registration_are_kept() {
        let engine = sqlite_engine(&election()).await;
        let report = engine
            .compute(&query("Atlantida", "La Ceiba", "Partido Azul"))
            .await
            .unwrap();

        let district = report.results.district_deputies;
        assert_eq!(district.empadronados, 200);
        assert_eq!(district.votos_recibidos, 12);

        let parliament = report.results.central_american_parliament;
        assert_eq!(parliament.empadronados, 200);
        assert_eq!(parliament.votos_recibidos, 0);
    }

    #[tokio::test]
    async fn team_sums_non_municipal_categories() {
        let engine = sqlite_engine(&election()).await;
        let report = engine
            .compute(&query("Atlantida", "La Ceiba", "Partido Azul"))
            .await
            .unwrap();
        let results = &report.results;

        let expected_padron: i64 = BallotCategory::TEAM
            .iter()
            .map(|c| results.get(*c).empadronados)
            .sum();
        let expected_received: i64 = BallotCategory::TEAM
            .iter()
            .map(|c| results.get(*c).votos_recibidos)
            .sum();

        assert_eq!(results.team.empadronados, expected_padron);
        assert_eq!(results.team.empadronados, 300 + 200 + 200 + 500);
        assert_eq!(results.team.votos_recibidos, expected_received);
        assert_eq!(results.team.votos_recibidos, 80 + 12 + 400);
        assert_eq!(results.team.votos_totales, 250 + 170 + 160 + 480);
        let emitidos = 280 + 185 + 180 + 490;
        assert_eq!(
            results.team.participacion,
            emitidos as f64 / expected_padron as f64 * 100.0
        );
    }

    #[tokio::test]
    async fn municipal_data_does_not_move_team() {
        let with_muni = sqlite_engine(&election()).await;
        let mut snapshot = election();
        snapshot
            .registrations
            .retain(|r| r.tipo != BallotCategory::Municipal);
        snapshot.votes.retain(|v| v.tipo != BallotCategory::Municipal);
        let without_muni = sqlite_engine(&snapshot).await;

        let q = query("Atlantida", "La Ceiba", "Partido Azul");
        let a = with_muni.compute(&q).await.unwrap();
        let b = without_muni.compute(&q).await.unwrap();

        assert_eq!(a.results.team, b.results.team);
        assert_ne!(a.results.municipal, b.results.municipal);
    }

    #[tokio::test]
    async fn unknown_municipality_reports_zeros() {
        let engine = sqlite_engine(&election()).await;
        let report = engine
            .compute(&query("Atlantida", "XYZ", "Partido Azul"))
            .await
            .unwrap();

        assert_eq!(report.results, BallotResults::zeroed());
        for (_, metrics) in report.results.entries() {
            assert_eq!(metrics.empadronados, 0);
            assert_eq!(metrics.votos_totales, 0);
            assert_eq!(metrics.votos_recibidos, 0);
            assert_eq!(metrics.participacion, 0.0);
            assert_eq!(metrics.eficiencia, 0.0);
        }
    }

    #[tokio::test]
    async fn unknown_party_fails() {
        let engine = sqlite_engine(&election()).await;

        let err = engine
            .compute(&query("Atlantida", "La Ceiba", "Nonexistent"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResultsError::PartyNotFound(ref name) if name == "Nonexistent"));

        // Also when the municipality has no mesas
        let err = engine
            .compute(&query("Atlantida", "XYZ", "Nonexistent"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResultsError::PartyNotFound(_)));
    }

    #[tokio::test]
    async fn empty_location_set_skips_aggregation() {
        let engine = ResultsEngine::new(MemoryStore::new(election()));
        engine
            .compute(&query("Atlantida", "XYZ", "Partido Azul"))
            .await
            .unwrap();
        assert_eq!(engine.store().aggregate_calls.get(), 0);

        engine
            .compute(&query("Atlantida", "La Ceiba", "Partido Azul"))
            .await
            .unwrap();
        assert_eq!(engine.store().aggregate_calls.get(), 2);
    }

    #[tokio::test]
    async fn zero_emitidos_everywhere_gives_zero_efficiency() {
        let mut snapshot = election();
        for record in &mut snapshot.registrations {
            record.emitidos = 0;
        }
        let engine = sqlite_engine(&snapshot).await;
        let report = engine
            .compute(&query("Atlantida", "La Ceiba", "Partido Azul"))
            .await
            .unwrap();

        for (key, metrics) in report.results.entries() {
            assert_eq!(metrics.eficiencia, 0.0, "{}", key);
            assert_eq!(metrics.participacion, 0.0, "{}", key);
            assert!(metrics.eficiencia.is_finite());
        }
    }

    #[tokio::test]
    async fn grouped_queries_match_per_mesa_walk() {
        let snapshot = election();
        let sqlite = sqlite_engine(&snapshot).await;
        let memory = ResultsEngine::new(MemoryStore::new(snapshot));

        for (municipality, party) in [
            ("La Ceiba", "Partido Azul"),
            ("La Ceiba", "Partido Rojo"),
            ("Tela", "Partido Azul"),
            ("XYZ", "Partido Rojo"),
        ] {
            let q = query("Atlantida", municipality, party);
            assert_eq!(
                sqlite.compute(&q).await.unwrap(),
                memory.compute(&q).await.unwrap(),
                "{} / {}",
                municipality,
                party
            );
        }
    }

    #[tokio::test]
    async fn unknown_stored_tipo_is_ignored() {
        let engine = sqlite_engine(&election()).await;
        let baseline = engine
            .compute(&query("Atlantida", "La Ceiba", "Partido Azul"))
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO metadata (mesa, tipo, padron, validos, emitidos) VALUES (101, 'ALCALDE', 999, 999, 999)",
        )
        .execute(engine.store().pool())
        .await
        .unwrap();
        sqlx::query("INSERT INTO voto (mesa, tipo, partido_id, voto) VALUES (101, 'ALCALDE', 1, 999)")
            .execute(engine.store().pool())
            .await
            .unwrap();

        let after = engine
            .compute(&query("Atlantida", "La Ceiba", "Partido Azul"))
            .await
            .unwrap();
        assert_eq!(baseline, after);

        let mut memory = MemoryStore::new(election());
        memory.raw_registrations.push((
            101,
            RegistrationTotals {
                tipo: "ALCALDE".to_string(),
                padron: 999,
                validos: 999,
                emitidos: 999,
            },
        ));
        let memory = ResultsEngine::new(memory);
        assert_eq!(
            memory
                .compute(&query("Atlantida", "La Ceiba", "Partido Azul"))
                .await
                .unwrap(),
            baseline
        );
    }

    #[tokio::test]
    async fn repeated_queries_serialize_identically() {
        let engine = sqlite_engine(&election()).await;
        let q = query("Atlantida", "La Ceiba", "Partido Azul");

        let first = serde_json::to_string(&engine.compute(&q).await.unwrap()).unwrap();
        let second = serde_json::to_string(&engine.compute(&q).await.unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn concurrent_queries_do_not_interfere() {
        let engine = sqlite_engine(&election()).await;
        let ceiba = query("Atlantida", "La Ceiba", "Partido Azul");
        let tela = query("Atlantida", "Tela", "Partido Azul");

        let (a, b) = tokio::join!(engine.compute(&ceiba), engine.compute(&tela));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a, engine.compute(&ceiba).await.unwrap());
        assert_eq!(b.results.president.empadronados, 900);
        assert_eq!(b.results.president.votos_recibidos, 700);
    }

    #[tokio::test]
    async fn listings_go_through_the_store() {
        let engine = ResultsEngine::new(MemoryStore::new(election()));
        assert_eq!(engine.departments().await.unwrap(), vec!["Atlantida"]);
        assert_eq!(
            engine.municipalities(" Atlantida ").await.unwrap(),
            vec!["La Ceiba", "Tela"]
        );
        assert!(engine.municipalities("  ").await.unwrap().is_empty());
        assert_eq!(
            engine.parties().await.unwrap(),
            vec!["Partido Azul", "Partido Rojo"]
        );
    }
}
