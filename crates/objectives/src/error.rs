//! Errors raised by the objective crates.

use thiserror::Error;

use crate::record::ObjectiveId;

/// Configuration and data errors. Expected control flow (a trigger whose
/// objective is not current, a counter already at its target) is never an error.
#[derive(Debug, Error)]
pub enum ObjectiveError {
    #[error("required collaborator missing: {0}")]
    MissingCollaborator(&'static str),

    #[error("an objective system is already installed; duplicate discarded")]
    DuplicateInstance,

    #[error("unknown objective `{0}`")]
    UnknownObjective(ObjectiveId),

    #[error("objective `{0}` is defined more than once")]
    DuplicateObjective(ObjectiveId),

    #[error("objective `{id}` is invalid: {reason}")]
    InvalidObjective { id: ObjectiveId, reason: String },

    #[error("could not parse objective data: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ObjectiveError> = std::result::Result<T, E>;
