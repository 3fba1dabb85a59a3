//! Unified error types for the domain layer
//!
//! Every rule component (resources, damage, death moves, rests, loadouts,
//! countdowns, conditions) reports failures through [`DomainError`], so the
//! engine can map them onto its own error classes without string matching.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., out-of-range field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (unknown enum value, malformed payload)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// A spend asked for more than the resource holds
    #[error("Insufficient {resource}: needed {needed}, available {available}")]
    InsufficientResource {
        resource: &'static str,
        needed: i32,
        available: i32,
    },

    /// Condition name outside the known set
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// Damage thresholds out of order
    #[error("Invalid damage thresholds: major {major}, severe {severe}")]
    InvalidThresholds { major: i32, severe: i32 },

    /// Active loadout is at capacity
    #[error("Loadout full: at most {capacity} active cards")]
    LoadoutFull { capacity: usize },

    /// Card appears twice across active and vault
    #[error("Duplicate card in loadout: {0}")]
    DuplicateCard(String),

    /// Card missing from the source list
    #[error("Card not found: {0}")]
    CardNotFound(String),

    /// Party must take a long rest
    #[error("Short rest limit reached: {cap} consecutive short rests, a long rest is required")]
    ShortRestLimitReached { cap: i32 },

    /// Update that would not change anything
    #[error("No-op update: {0}")]
    NoOpUpdate(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when payload or state values fall outside their allowed
    /// ranges, or when required fields are missing.
    ///
    /// # Example
    /// ```ignore
    /// if hp > HP_CAP {
    ///     return Err(DomainError::validation("hp_after must be in range 0..=12"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for RestType {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "short" => Ok(Self::Short),
    ///             _ => Err(DomainError::parse(format!("Unknown rest type: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    /// Create an insufficient resource error
    pub fn insufficient(resource: &'static str, needed: i32, available: i32) -> Self {
        Self::InsufficientResource {
            resource,
            needed,
            available,
        }
    }

    /// Create a no-op error
    pub fn no_op(msg: impl Into<String>) -> Self {
        Self::NoOpUpdate(msg.into())
    }

    /// Returns true when the error is a referential miss rather than bad input.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("hp_after out of range");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: hp_after out of range");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Adversary", "adv-1");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Adversary"));
        assert!(err.to_string().contains("adv-1"));
    }

    #[test]
    fn test_insufficient_resource_error() {
        let err = DomainError::insufficient("stress", 3, 1);
        assert_eq!(err.to_string(), "Insufficient stress: needed 3, available 1");
    }

    #[test]
    fn test_loadout_full_error() {
        let err = DomainError::LoadoutFull { capacity: 5 };
        assert_eq!(err.to_string(), "Loadout full: at most 5 active cards");
    }
}
