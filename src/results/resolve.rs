use crate::model::{MesaId, PartyId};
use crate::results::store::ResultsStore;
use crate::results::{ResultsError, ResultsResult};
use log::debug;

/// Mesas of a (department, municipality) pair. An empty set is a valid
/// answer, not an error.
pub async fn resolve_locations<S: ResultsStore>(
    store: &S,
    department: &str,
    municipality: &str,
) -> ResultsResult<Vec<MesaId>> {
    let mesas = store.mesas_for(department, municipality).await?;
    debug!(
        "Resolved {} mesas for {} / {}",
        mesas.len(),
        department,
        municipality
    );
    Ok(mesas)
}

/// Party id for an exact display name.
pub async fn resolve_party<S: ResultsStore>(store: &S, name: &str) -> ResultsResult<PartyId> {
    match store.party_id_for(name).await? {
        Some(party_id) => {
            debug!("Resolved party {} to id {}", name, party_id);
            Ok(party_id)
        }
        None => Err(ResultsError::PartyNotFound(name.to_string())),
    }
}
