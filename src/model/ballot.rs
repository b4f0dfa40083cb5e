use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a polling table ("mesa").
pub type MesaId = i64;

/// Internal join key of a party.
pub type PartyId = i64;

/// The ballots cast at every mesa.
///
/// Declaration order is the order categories appear in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BallotCategory {
    #[serde(rename = "CORPORACION_MUNICIPAL")]
    Municipal,
    #[serde(rename = "DIPUTADOS_NACIONAL")]
    NationalDeputies,
    #[serde(rename = "DIPUTADOS_DISTRITAL")]
    DistrictDeputies,
    #[serde(rename = "PARLAMENTO_CENTROAMERICANO")]
    CentralAmericanParliament,
    #[serde(rename = "PRESIDENTE")]
    President,
}

impl BallotCategory {
    pub const ALL: [BallotCategory; 5] = [
        BallotCategory::Municipal,
        BallotCategory::NationalDeputies,
        BallotCategory::DistrictDeputies,
        BallotCategory::CentralAmericanParliament,
        BallotCategory::President,
    ];

    /// Categories summed into the TEAM composite. The municipal contest is
    /// never part of it.
    pub const TEAM: [BallotCategory; 4] = [
        BallotCategory::NationalDeputies,
        BallotCategory::DistrictDeputies,
        BallotCategory::CentralAmericanParliament,
        BallotCategory::President,
    ];

    /// Short key used in reports.
    pub fn key(self) -> &'static str {
        match self {
            BallotCategory::Municipal => "MUNI",
            BallotCategory::NationalDeputies => "D_LN",
            BallotCategory::DistrictDeputies => "D_DI",
            BallotCategory::CentralAmericanParliament => "D_PA",
            BallotCategory::President => "PRES",
        }
    }

    /// Value of the `tipo` column in the store.
    pub fn tipo(self) -> &'static str {
        match self {
            BallotCategory::Municipal => "CORPORACION_MUNICIPAL",
            BallotCategory::NationalDeputies => "DIPUTADOS_NACIONAL",
            BallotCategory::DistrictDeputies => "DIPUTADOS_DISTRITAL",
            BallotCategory::CentralAmericanParliament => "PARLAMENTO_CENTROAMERICANO",
            BallotCategory::President => "PRESIDENTE",
        }
    }
}

impl fmt::Display for BallotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown ballot category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for BallotCategory {
    type Err = UnknownCategory;

    /// Parses a stored `tipo` value. Matching is exact.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BallotCategory::ALL
            .iter()
            .copied()
            .find(|category| category.tipo() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
