pub mod ballot;
pub mod metrics;

pub use ballot::{BallotCategory, MesaId, PartyId};
pub use metrics::RawMetrics;
