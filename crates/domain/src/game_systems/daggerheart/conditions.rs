//! Status conditions and the canonical condition list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Standard Daggerheart conditions.
///
/// Declaration order is the canonical sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Hidden,
    Restrained,
    Vulnerable,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Self::Hidden, Self::Restrained, Self::Vulnerable];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Restrained => "restrained",
            Self::Vulnerable => "vulnerable",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hidden" => Ok(Self::Hidden),
            "restrained" => Ok(Self::Restrained),
            "vulnerable" => Ok(Self::Vulnerable),
            "" => Err(DomainError::InvalidCondition("condition is required".into())),
            other => Err(DomainError::InvalidCondition(other.to_string())),
        }
    }
}

/// Parse raw names into a deduplicated list in canonical order.
pub fn normalize_conditions<S: AsRef<str>>(values: &[S]) -> Result<Vec<Condition>, DomainError> {
    let mut out = values
        .iter()
        .map(|v| v.as_ref().parse::<Condition>())
        .collect::<Result<Vec<_>, _>>()?;
    out.sort();
    out.dedup();
    Ok(out)
}

/// Conditions gained and lost between two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDiff {
    pub added: Vec<Condition>,
    pub removed: Vec<Condition>,
}

impl ConditionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// `added` keeps the order of `after`, `removed` keeps the order of `before`.
pub fn condition_diff(before: &[Condition], after: &[Condition]) -> ConditionDiff {
    ConditionDiff {
        added: after
            .iter()
            .filter(|c| !before.contains(c))
            .copied()
            .collect(),
        removed: before
            .iter()
            .filter(|c| !after.contains(c))
            .copied()
            .collect(),
    }
}

/// Positional comparison. Both lists must already be normalized.
pub fn conditions_equal(a: &[Condition], b: &[Condition]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}
