//! Field checks shared by event payloads.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::game_systems::daggerheart::{
    condition_diff, normalize_conditions, Condition, ConditionDiff,
};

pub(crate) fn require_id(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn check_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), DomainError> {
    crate::game_systems::daggerheart::ensure_range(field, value, min, max)
}

pub(crate) fn check_opt(field: &str, value: Option<i32>, min: i32, max: i32) -> Result<(), DomainError> {
    match value {
        Some(v) => check_range(field, v, min, max),
        None => Ok(()),
    }
}

pub(crate) fn check_roll_seq(value: Option<u64>) -> Result<(), DomainError> {
    if value == Some(0) {
        return Err(DomainError::validation("roll_seq must be positive"));
    }
    Ok(())
}

pub(crate) fn check_die(field: &str, value: Option<u8>, sides: u8) -> Result<(), DomainError> {
    match value {
        Some(v) if v == 0 || v > sides => Err(DomainError::validation(format!(
            "{field} must be in range 1..={sides}, got {v}"
        ))),
        _ => Ok(()),
    }
}

/// Condition fields carried by condition events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions_before: Option<Vec<String>>,
    pub conditions_after: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<Vec<String>>,
}

/// A condition patch after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedConditions {
    pub before: Option<Vec<Condition>>,
    pub after: Vec<Condition>,
    pub diff: Option<ConditionDiff>,
}

impl ConditionPatch {
    pub fn from_change(before: &[Condition], after: &[Condition]) -> Self {
        let diff = condition_diff(before, after);
        let names = |list: &[Condition]| list.iter().map(|c| c.as_str().to_string()).collect();
        Self {
            conditions_before: Some(names(before)),
            conditions_after: names(after),
            added: Some(names(&diff.added)),
            removed: Some(names(&diff.removed)),
        }
    }

    /// Normalize every list and check that they agree with each other.
    pub fn normalize(&self) -> Result<NormalizedConditions, DomainError> {
        let after = normalize_conditions(&self.conditions_after)?;
        let before = self
            .conditions_before
            .as_deref()
            .map(normalize_conditions)
            .transpose()?;
        let added = self.added.as_deref().map(normalize_conditions).transpose()?;
        let removed = self.removed.as_deref().map(normalize_conditions).transpose()?;

        match &before {
            Some(before) => {
                if before == &after {
                    return Err(DomainError::no_op("conditions unchanged"));
                }
                // Both sides are canonical, so the diff lists are too.
                let diff = condition_diff(before, &after);
                if added.as_ref().is_some_and(|a| a != &diff.added) {
                    return Err(DomainError::validation("added does not match before/after"));
                }
                if removed.as_ref().is_some_and(|r| r != &diff.removed) {
                    return Err(DomainError::validation("removed does not match before/after"));
                }
                Ok(NormalizedConditions {
                    before: Some(before.clone()),
                    after,
                    diff: Some(diff),
                })
            }
            None => {
                let added = added.unwrap_or_default();
                let removed = removed.unwrap_or_default();
                if after.is_empty() && added.is_empty() && removed.is_empty() {
                    return Err(DomainError::no_op("condition change is empty"));
                }
                if added.iter().any(|c| !after.contains(c)) {
                    return Err(DomainError::validation("added condition missing from after"));
                }
                if removed.iter().any(|c| after.contains(c)) {
                    return Err(DomainError::validation("removed condition still in after"));
                }
                Ok(NormalizedConditions {
                    before: None,
                    after,
                    diff: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn patch_from_change_normalizes_cleanly() {
        let patch = ConditionPatch::from_change(&[Condition::Hidden], &[Condition::Vulnerable]);
        let normalized = patch.normalize().unwrap();
        assert_eq!(normalized.after, vec![Condition::Vulnerable]);
        let diff = normalized.diff.unwrap();
        assert_eq!(diff.added, vec![Condition::Vulnerable]);
        assert_eq!(diff.removed, vec![Condition::Hidden]);
    }

    #[test]
    fn unchanged_before_after_is_a_no_op() {
        let patch = ConditionPatch {
            conditions_before: Some(strings(&["hidden"])),
            conditions_after: strings(&["Hidden"]),
            ..Default::default()
        };
        assert!(matches!(patch.normalize(), Err(DomainError::NoOpUpdate(_))));
    }

    #[test]
    fn mismatched_added_is_rejected() {
        let patch = ConditionPatch {
            conditions_before: Some(vec![]),
            conditions_after: strings(&["hidden"]),
            added: Some(strings(&["vulnerable"])),
            removed: None,
        };
        assert!(matches!(patch.normalize(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn empty_change_without_before_is_a_no_op() {
        let patch = ConditionPatch::default();
        assert!(matches!(patch.normalize(), Err(DomainError::NoOpUpdate(_))));
    }

    #[test]
    fn clearing_without_before_needs_removed() {
        let patch = ConditionPatch {
            removed: Some(strings(&["restrained"])),
            ..Default::default()
        };
        let normalized = patch.normalize().unwrap();
        assert!(normalized.after.is_empty());
    }

    #[test]
    fn unknown_condition_is_rejected() {
        let patch = ConditionPatch {
            conditions_after: strings(&["mystery"]),
            ..Default::default()
        };
        assert!(matches!(
            patch.normalize(),
            Err(DomainError::InvalidCondition(_))
        ));
    }

    #[test]
    fn roll_seq_zero_is_rejected() {
        assert!(check_roll_seq(Some(0)).is_err());
        assert!(check_roll_seq(Some(3)).is_ok());
        assert!(check_roll_seq(None).is_ok());
    }
}
