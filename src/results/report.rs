use crate::model::{BallotCategory, RawMetrics};
use crate::results::aggregate::CategoryTotals;
use crate::results::composite::build_team;
use crate::results::ratios::Ratios;
use crate::results::ResultsQuery;
use serde::{Deserialize, Serialize};

pub const TEAM_KEY: &str = "TEAM";

/// Metrics of one ballot category as published.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallotMetrics {
    pub empadronados: i64,
    pub votos_totales: i64,
    pub votos_recibidos: i64,
    pub participacion: f64,
    pub eficiencia: f64,
}

impl BallotMetrics {
    pub fn from_raw(raw: &RawMetrics) -> Self {
        let ratios = Ratios::from_raw(raw);
        Self {
            empadronados: raw.padron,
            votos_totales: raw.validos,
            votos_recibidos: raw.recibidos,
            participacion: ratios.participacion,
            eficiencia: ratios.eficiencia,
        }
    }

    pub fn zero() -> Self {
        Self::from_raw(&RawMetrics::ZERO)
    }
}

/// The five ballot categories plus the TEAM composite, serialized in this
/// fixed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallotResults {
    #[serde(rename = "MUNI")]
    pub municipal: BallotMetrics,
    #[serde(rename = "D_LN")]
    pub national_deputies: BallotMetrics,
    #[serde(rename = "D_DI")]
    pub district_deputies: BallotMetrics,
    #[serde(rename = "D_PA")]
    pub central_american_parliament: BallotMetrics,
    #[serde(rename = "PRES")]
    pub president: BallotMetrics,
    #[serde(rename = "TEAM")]
    pub team: BallotMetrics,
}

impl BallotResults {
    /// Categories missing from `per_category` are reported as zero.
    pub fn from_totals(per_category: &CategoryTotals) -> Self {
        let metrics = |category: BallotCategory| {
            BallotMetrics::from_raw(&per_category.get(&category).copied().unwrap_or_default())
        };

        Self {
            municipal: metrics(BallotCategory::Municipal),
            national_deputies: metrics(BallotCategory::NationalDeputies),
            district_deputies: metrics(BallotCategory::DistrictDeputies),
            central_american_parliament: metrics(BallotCategory::CentralAmericanParliament),
            president: metrics(BallotCategory::President),
            team: BallotMetrics::from_raw(&build_team(per_category)),
        }
    }

    pub fn zeroed() -> Self {
        Self::from_totals(&CategoryTotals::new())
    }

    pub fn get(&self, category: BallotCategory) -> &BallotMetrics {
        match category {
            BallotCategory::Municipal => &self.municipal,
            BallotCategory::NationalDeputies => &self.national_deputies,
            BallotCategory::DistrictDeputies => &self.district_deputies,
            BallotCategory::CentralAmericanParliament => &self.central_american_parliament,
            BallotCategory::President => &self.president,
        }
    }

    /// All six entries with their report keys.
    pub fn entries(&self) -> Vec<(&'static str, &BallotMetrics)> {
        BallotCategory::ALL
            .iter()
            .map(|category| (category.key(), self.get(*category)))
            .chain(std::iter::once((TEAM_KEY, &self.team)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsReport {
    pub department: String,
    pub municipality: String,
    pub party: String,
    pub results: BallotResults,
}

impl ResultsReport {
    pub fn new(query: &ResultsQuery, results: BallotResults) -> Self {
        Self {
            department: query.department().to_string(),
            municipality: query.municipality().to_string(),
            party: query.party().to_string(),
            results,
        }
    }
}
