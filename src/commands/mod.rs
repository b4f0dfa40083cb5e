mod listing;
mod load;
mod results;

pub use listing::{departments, municipalities, parties};
pub use load::{load, verify};
pub use results::{results, OutputFormat};

use crate::database::DatabaseError;
use crate::results::ResultsError;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Results(#[from] ResultsError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;

impl CommandError {
    /// 2 for selections the store cannot answer, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Results(ResultsError::Validation { .. })
            | CommandError::Results(ResultsError::PartyNotFound(_)) => 2,
            _ => 1,
        }
    }
}
