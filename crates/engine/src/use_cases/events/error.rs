//! Event application errors.

use serde_json::error::Category;

use crate::infrastructure::ports::RepoError;
use daggerheart_domain::DomainError;

/// Errors that stop an event from being applied. None of them leave a
/// partial write behind.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// The event is not well-formed JSON.
    #[error("Malformed event: {0}")]
    Decode(String),
    /// Missing ids, out-of-range fields, unknown enum values, rule violations.
    #[error("Invalid event: {0}")]
    Validation(#[from] DomainError),
    /// The event targets a row that must already exist.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    /// The event was produced against a different countdown value.
    #[error("Stale countdown {countdown_id}: event expects {expected}, stored value is {actual}")]
    StaleCountdown {
        countdown_id: String,
        expected: i32,
        actual: i32,
    },
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),
    #[error("Event for {system_id} {system_version} does not belong to this game system")]
    SystemMismatch {
        system_id: String,
        system_version: String,
    },
}

impl ApplyError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Syntax errors are decode failures; well-formed JSON with the wrong
    /// shape is a validation failure.
    pub fn from_json(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::Validation(DomainError::parse(err.to_string())),
            Category::Io | Category::Syntax | Category::Eof => Self::Decode(err.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_are_decode_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(ApplyError::from_json(err), ApplyError::Decode(_)));
    }

    #[test]
    fn shape_errors_are_validation_errors() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            id: String,
        }
        let err = serde_json::from_str::<Needs>("{}").unwrap_err();
        assert!(matches!(
            ApplyError::from_json(err),
            ApplyError::Validation(DomainError::Parse(_))
        ));
    }
}
