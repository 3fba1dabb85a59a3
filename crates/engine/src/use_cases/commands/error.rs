//! Command execution errors.

use daggerheart_domain::DomainError;

use crate::infrastructure::ports::RepoError;
use crate::use_cases::events::ApplyError;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The command was malformed or broke a game rule.
    #[error("Command rejected: {0}")]
    Domain(#[from] DomainError),
    /// A decided event failed to apply.
    #[error("Apply failed: {0}")]
    Apply(#[from] ApplyError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Unknown command type: {0}")]
    UnknownCommandType(String),
    #[error("Failed to encode event: {0}")]
    Encode(String),
}

impl CommandError {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Domain(DomainError::NotFound { .. }) => true,
            Self::Apply(e) => e.is_not_found(),
            Self::Repo(e) => e.is_not_found(),
            _ => false,
        }
    }
}
