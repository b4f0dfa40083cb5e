use crate::database::{RegistrationTotals, Result, VoteTotals};
use crate::model::{MesaId, PartyId};

/// Read-only queries the results engine needs from an election store.
///
/// The grouped-sum methods return one row per `tipo` present in the data;
/// tipos without rows are simply missing and callers fill them in.
#[allow(async_fn_in_trait)]
pub trait ResultsStore {
    async fn mesas_for(&self, department: &str, municipality: &str) -> Result<Vec<MesaId>>;

    async fn party_id_for(&self, name: &str) -> Result<Option<PartyId>>;

    async fn registration_totals(&self, mesas: &[MesaId]) -> Result<Vec<RegistrationTotals>>;

    async fn party_vote_totals(&self, mesas: &[MesaId], party_id: PartyId) -> Result<Vec<VoteTotals>>;

    async fn departments(&self) -> Result<Vec<String>>;

    async fn municipalities(&self, department: &str) -> Result<Vec<String>>;

    async fn parties(&self) -> Result<Vec<String>>;
}
