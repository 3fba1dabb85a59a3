//! Adversary projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::game_systems::daggerheart::{
    ensure_range, normalize_conditions, Condition, ARMOR_CAP, HP_CAP, STRESS_CAP,
};
use crate::ids::{AdversaryId, CampaignId, SessionId};

/// An adversary on the GM's side of the table.
///
/// # Invariants
///
/// - `name` is non-blank
/// - `0 <= hp <= hp_max <= HP_CAP`, `0 <= stress <= stress_max <= STRESS_CAP`
/// - `0 <= major_threshold <= severe_threshold`
/// - `evasion >= 0`, `0 <= armor <= ARMOR_CAP`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryState {
    pub campaign_id: CampaignId,
    pub adversary_id: AdversaryId,
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub notes: String,
    pub hp: i32,
    pub hp_max: i32,
    #[serde(default)]
    pub stress: i32,
    pub stress_max: i32,
    pub evasion: i32,
    pub major_threshold: i32,
    pub severe_threshold: i32,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdversaryState {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("adversary name is required"));
        }
        self.stats().validate()?;
        let names: Vec<&str> = self.conditions.iter().map(Condition::as_str).collect();
        if normalize_conditions(&names)? != self.conditions {
            return Err(DomainError::validation("conditions must be normalized"));
        }
        if self.updated_at < self.created_at {
            return Err(DomainError::validation("updated_at precedes created_at"));
        }
        Ok(())
    }

    pub fn stats(&self) -> AdversaryStats {
        AdversaryStats {
            hp: self.hp,
            hp_max: self.hp_max,
            stress: self.stress,
            stress_max: self.stress_max,
            evasion: self.evasion,
            major_threshold: self.major_threshold,
            severe_threshold: self.severe_threshold,
            armor: self.armor,
        }
    }

    /// Stamp a mutation. Time never runs backwards on the record.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at.max(self.created_at);
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

/// The numeric block of an adversary, checkable before the record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdversaryStats {
    pub hp: i32,
    pub hp_max: i32,
    pub stress: i32,
    pub stress_max: i32,
    pub evasion: i32,
    pub major_threshold: i32,
    pub severe_threshold: i32,
    pub armor: i32,
}

impl AdversaryStats {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_range("hp_max", self.hp_max, 0, HP_CAP)?;
        ensure_range("hp", self.hp, 0, self.hp_max)?;
        ensure_range("stress_max", self.stress_max, 0, STRESS_CAP)?;
        ensure_range("stress", self.stress, 0, self.stress_max)?;
        ensure_range("armor", self.armor, 0, ARMOR_CAP)?;
        if self.evasion < 0 {
            return Err(DomainError::validation(format!(
                "evasion must be non-negative, got {}",
                self.evasion
            )));
        }
        if self.major_threshold < 0 || self.severe_threshold < self.major_threshold {
            return Err(DomainError::InvalidThresholds {
                major: self.major_threshold,
                severe: self.severe_threshold,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn goblin() -> AdversaryState {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        AdversaryState {
            campaign_id: CampaignId::new("camp").unwrap(),
            adversary_id: AdversaryId::new("gob-1").unwrap(),
            name: "Goblin".into(),
            kind: "minion".into(),
            session_id: None,
            notes: String::new(),
            hp: 3,
            hp_max: 3,
            stress: 0,
            stress_max: 2,
            evasion: 10,
            major_threshold: 4,
            severe_threshold: 8,
            armor: 1,
            conditions: vec![],
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn valid_adversary_passes() {
        assert!(goblin().validate().is_ok());
    }

    #[test]
    fn hp_above_max_fails() {
        let mut adv = goblin();
        adv.hp = 4;
        assert!(adv.validate().is_err());
    }

    #[test]
    fn thresholds_must_be_ordered() {
        let mut adv = goblin();
        adv.severe_threshold = 2;
        assert!(matches!(
            adv.validate(),
            Err(DomainError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn blank_name_fails() {
        let mut adv = goblin();
        adv.name = "  ".into();
        assert!(adv.validate().is_err());
    }

    #[test]
    fn touch_never_precedes_creation() {
        let mut adv = goblin();
        let earlier = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        adv.touch(earlier);
        assert_eq!(adv.updated_at, adv.created_at);
    }
}
