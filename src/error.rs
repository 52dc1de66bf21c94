use thiserror::Error;

use crate::model::election::ElectionId;

pub type Result<T> = std::result::Result<T, Error>;

/// Every way an engine operation can fail. All checks happen before any
/// mutation, so receiving one of these means the state is unchanged.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),
    #[error("Already voted in election {0}")]
    AlreadyVoted(ElectionId),
    #[error("Election {0} is already finalized")]
    AlreadyFinalized(ElectionId),
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),
    #[error("Not eligible: {0}")]
    NotEligible(String),
    #[error(transparent)]
    Config(#[from] figment::Error),
}
