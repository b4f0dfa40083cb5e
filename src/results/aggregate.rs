use crate::database::{RegistrationTotals, Result, VoteTotals};
use crate::model::{BallotCategory, MesaId, PartyId, RawMetrics};
use crate::results::store::ResultsStore;
use instant::Instant;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Raw sums keyed by category, in report order.
pub type CategoryTotals = BTreeMap<BallotCategory, RawMetrics>;

/// Sum registration counts and the party's votes per category over `mesas`.
///
/// Issues one grouped query per record kind, whatever the number of mesas
/// or categories. The returned map always holds all five categories.
pub async fn aggregate<S: ResultsStore>(
    store: &S,
    mesas: &[MesaId],
    party_id: PartyId,
) -> Result<CategoryTotals> {
    let start = Instant::now();

    let registrations = store.registration_totals(mesas).await?;
    let votes = store.party_vote_totals(mesas, party_id).await?;

    debug!(
        "Aggregated {} mesas for party {} in {} ms ({} registration groups, {} vote groups)",
        mesas.len(),
        party_id,
        start.elapsed().as_millis(),
        registrations.len(),
        votes.len()
    );

    Ok(merge_totals(&registrations, &votes))
}

/// Zero-fill every category, then fold in whatever groups the store
/// returned. Groups with an unknown tipo are skipped.
pub fn merge_totals(registrations: &[RegistrationTotals], votes: &[VoteTotals]) -> CategoryTotals {
    let mut totals: CategoryTotals = BallotCategory::ALL
        .iter()
        .map(|category| (*category, RawMetrics::ZERO))
        .collect();

    for row in registrations {
        match row.tipo.parse::<BallotCategory>() {
            Ok(category) => {
                let entry = totals.entry(category).or_default();
                entry.padron += row.padron;
                entry.validos += row.validos;
                entry.emitidos += row.emitidos;
            }
            Err(e) => warn!("Ignoring registration totals: {}", e),
        }
    }

    for row in votes {
        match row.tipo.parse::<BallotCategory>() {
            Ok(category) => totals.entry(category).or_default().recibidos += row.votos,
            Err(e) => warn!("Ignoring vote totals: {}", e),
        }
    }

    totals
}
