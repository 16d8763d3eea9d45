//! Label operation errors.

use crate::infrastructure::ports::RepoError;
use tabletop_domain::{DomainError, LabelId};

/// Errors that can occur during label operations.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("Label not found: {0}")]
    NotFound(LabelId),
    #[error("Label {0} is owned by another user")]
    NotOwner(LabelId),
    #[error("Label claims owner '{claimed}' but was sent by '{actor}'")]
    ForeignOwner { claimed: String, actor: String },
    #[error("Label already exists: {0}")]
    DuplicateId(LabelId),
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl LabelError {
    /// Attempts to act on someone else's label.
    pub fn is_authorization_violation(&self) -> bool {
        matches!(self, Self::NotOwner(_) | Self::ForeignOwner { .. })
    }
}
