//! Audit-only payloads. These are validated and recorded but change no
//! projection.

use serde::{Deserialize, Serialize};

use super::checks::{check_range, require_id};
use crate::error::DomainError;
use crate::game_systems::daggerheart::D20;

fn check_attack(roll_seq: u64, attack_roll: i32) -> Result<(), DomainError> {
    if roll_seq == 0 {
        return Err(DomainError::validation("roll_seq must be positive"));
    }
    check_range("attack_roll", attack_roll, 1, i32::from(D20))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResolvedPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    pub roll_seq: u64,
    pub attack_roll: i32,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit: Option<bool>,
}

impl AttackResolvedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_attack(self.roll_seq, self.attack_roll)?;
        require_id("target_id", &self.target_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryAttackResolvedPayload {
    pub adversary_id: String,
    pub roll_seq: u64,
    pub attack_roll: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit: Option<bool>,
}

impl AdversaryAttackResolvedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("adversary_id", &self.adversary_id)?;
        check_attack(self.roll_seq, self.attack_roll)
    }
}
