//! Room administration errors.

use crate::infrastructure::ports::RepoError;
use tabletop_domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("Room not found")]
    NotFound,
    #[error("A room with this name already exists")]
    AlreadyExists,
    #[error("Only the room creator can do this")]
    NotCreator,
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
