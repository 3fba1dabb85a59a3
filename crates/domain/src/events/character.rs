//! Character event payloads.

use serde::{Deserialize, Serialize};

use super::checks::{check_die, check_opt, check_range, check_roll_seq, require_id, ConditionPatch};
use crate::error::DomainError;
use crate::game_systems::daggerheart::{
    ArmorDuration, DamageSeverity, DeathMove, DowntimeMove, LifeState, LoadoutZone, ARMOR_CAP,
    D12, HOPE_CAP, HP_CAP, STRESS_CAP,
};

/// Partial before/after patch of a character's resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStatePatchedPayload {
    pub character_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_max_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_max_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_state_before: Option<LifeState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_state_after: Option<LifeState>,
}

impl CharacterStatePatchedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("character_id", &self.character_id)?;
        check_opt("hp_before", self.hp_before, 0, HP_CAP)?;
        check_opt("hp_after", self.hp_after, 0, HP_CAP)?;
        check_opt("hope_before", self.hope_before, 0, HOPE_CAP)?;
        check_opt("hope_after", self.hope_after, 0, HOPE_CAP)?;
        check_opt("hope_max_before", self.hope_max_before, 0, HOPE_CAP)?;
        check_opt("hope_max_after", self.hope_max_after, 0, HOPE_CAP)?;
        check_opt("stress_before", self.stress_before, 0, STRESS_CAP)?;
        check_opt("stress_after", self.stress_after, 0, STRESS_CAP)?;
        check_opt("armor_before", self.armor_before, 0, ARMOR_CAP)?;
        check_opt("armor_after", self.armor_after, 0, ARMOR_CAP)?;
        if let (Some(hope), Some(max)) = (self.hope_after, self.hope_max_after) {
            if hope > max {
                return Err(DomainError::validation(format!(
                    "hope_after {hope} exceeds hope_max_after {max}"
                )));
            }
        }
        let touches_anything = self.hp_after.is_some()
            || self.hope_after.is_some()
            || self.hope_max_after.is_some()
            || self.stress_after.is_some()
            || self.armor_after.is_some()
            || self.life_state_after.is_some();
        if !touches_anything {
            return Err(DomainError::no_op("character patch sets no fields"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageAppliedPayload {
    pub character_id: String,
    pub damage: i32,
    pub severity: DamageSeverity,
    pub marks: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_seq: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_spent: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigated: Option<bool>,
}

impl DamageAppliedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("character_id", &self.character_id)?;
        validate_damage_fields(
            self.damage,
            self.severity,
            self.marks,
            self.roll_seq,
            (self.hp_before, self.hp_after),
            (self.armor_before, self.armor_after),
            self.armor_spent,
        )
    }
}

/// Checks shared by character and adversary damage events.
pub(crate) fn validate_damage_fields(
    damage: i32,
    severity: DamageSeverity,
    marks: i32,
    roll_seq: Option<u64>,
    hp: (Option<i32>, Option<i32>),
    armor: (Option<i32>, Option<i32>),
    armor_spent: Option<i32>,
) -> Result<(), DomainError> {
    if damage < 0 {
        return Err(DomainError::validation(format!(
            "damage must be non-negative, got {damage}"
        )));
    }
    if marks != severity.marks() {
        return Err(DomainError::validation(format!(
            "{severity} damage marks {} HP, got {marks}",
            severity.marks()
        )));
    }
    check_roll_seq(roll_seq)?;
    check_opt("hp_before", hp.0, 0, HP_CAP)?;
    check_opt("hp_after", hp.1, 0, HP_CAP)?;
    check_opt("armor_before", armor.0, 0, ARMOR_CAP)?;
    check_opt("armor_after", armor.1, 0, ARMOR_CAP)?;
    check_opt("armor_spent", armor_spent, 0, 1)?;
    if let (Some(before), Some(after)) = hp {
        if after > before {
            return Err(DomainError::validation("damage cannot raise hp"));
        }
    }
    if let (Some(before), Some(after)) = armor {
        if after > before {
            return Err(DomainError::validation("damage cannot raise armor"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionChangedPayload {
    pub character_id: String,
    #[serde(flatten)]
    pub conditions: ConditionPatch,
}

impl ConditionChangedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("character_id", &self.character_id)?;
        self.conditions.normalize().map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryArmorAppliedPayload {
    pub character_id: String,
    pub source: String,
    pub duration: ArmorDuration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub amount: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_after: Option<i32>,
}

impl TemporaryArmorAppliedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("character_id", &self.character_id)?;
        require_id("source", &self.source)?;
        check_range("amount", self.amount, 1, ARMOR_CAP)?;
        check_opt("armor_before", self.armor_before, 0, ARMOR_CAP)?;
        check_opt("armor_after", self.armor_after, 0, ARMOR_CAP)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DowntimeMoveAppliedPayload {
    pub character_id: String,
    #[serde(rename = "move")]
    pub downtime_move: DowntimeMove,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_after: Option<i32>,
}

impl DowntimeMoveAppliedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("character_id", &self.character_id)?;
        check_opt("hp_before", self.hp_before, 0, HP_CAP)?;
        check_opt("hp_after", self.hp_after, 0, HP_CAP)?;
        check_opt("hope_before", self.hope_before, 0, HOPE_CAP)?;
        check_opt("hope_after", self.hope_after, 0, HOPE_CAP)?;
        check_opt("stress_before", self.stress_before, 0, STRESS_CAP)?;
        check_opt("stress_after", self.stress_after, 0, STRESS_CAP)?;
        check_opt("armor_before", self.armor_before, 0, ARMOR_CAP)?;
        check_opt("armor_after", self.armor_after, 0, ARMOR_CAP)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutSwappedPayload {
    pub character_id: String,
    pub card_id: String,
    pub from: LoadoutZone,
    pub to: LoadoutZone,
    #[serde(default)]
    pub recall_cost: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_after: Option<i32>,
}

impl LoadoutSwappedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("character_id", &self.character_id)?;
        require_id("card_id", &self.card_id)?;
        if self.from == self.to {
            return Err(DomainError::no_op(format!("card already in {}", self.to)));
        }
        if self.recall_cost < 0 {
            return Err(DomainError::validation("recall_cost must be non-negative"));
        }
        check_opt("stress_before", self.stress_before, 0, STRESS_CAP)?;
        check_opt("stress_after", self.stress_after, 0, STRESS_CAP)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathMoveResolvedPayload {
    pub character_id: String,
    #[serde(rename = "move")]
    pub death_move: DeathMove,
    pub life_state_after: LifeState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_seq: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_die: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fear_die: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_max_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scarred: Option<bool>,
}

impl DeathMoveResolvedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("character_id", &self.character_id)?;
        check_roll_seq(self.roll_seq)?;
        check_die("hope_die", self.hope_die, D12)?;
        check_die("fear_die", self.fear_die, D12)?;
        check_opt("hp_after", self.hp_after, 0, HP_CAP)?;
        check_opt("hope_after", self.hope_after, 0, HOPE_CAP)?;
        check_opt("hope_max_after", self.hope_max_after, 0, HOPE_CAP)?;
        check_opt("stress_after", self.stress_after, 0, STRESS_CAP)?;

        if self.death_move.uses_dice() && self.roll_seq.is_none() {
            return Err(DomainError::validation(format!(
                "{} requires roll_seq",
                self.death_move
            )));
        }

        let consistent = match self.death_move {
            DeathMove::BlazeOfGlory => self.life_state_after == LifeState::BlazeOfGlory,
            DeathMove::AvoidDeath => {
                self.hope_die.is_some() && self.life_state_after == LifeState::Unconscious
            }
            DeathMove::RiskItAll => {
                self.hope_die.is_some()
                    && self.fear_die.is_some()
                    && matches!(self.life_state_after, LifeState::Alive | LifeState::Dead)
            }
        };
        if !consistent {
            return Err(DomainError::invalid_state_transition(format!(
                "{} cannot end in {}",
                self.death_move, self.life_state_after
            )));
        }
        Ok(())
    }
}
