//! Daggerheart game system implementation.
//!
//! Daggerheart tracks a small set of bounded resources per character (HP,
//! Hope, Stress, Armor) plus the GM's Fear pool per campaign. Key features:
//! - Damage is sorted into severity tiers by thresholds, each tier marking HP
//! - One Armor slot can step a hit down a tier
//! - Death moves decide what happens at 0 HP
//! - Short/long rests with a cap on consecutive short rests
//! - Countdowns for progress and consequence clocks
//! - Downtime moves that clear a track during a rest

mod conditions;
mod countdown;
mod damage;
mod death_move;
mod dice;
mod downtime;
mod loadout;
mod resources;
mod rest;

pub use conditions::{
    condition_diff, conditions_equal, normalize_conditions, Condition, ConditionDiff,
};
pub use countdown::{
    apply_countdown_update, CountdownDirection, CountdownKind, CountdownSpec, CountdownUpdate,
};
pub use damage::{
    apply_damage_marks, apply_resistance, evaluate_damage, reduce_damage_with_armor,
    resolve_damage, DamageRequest, DamageResolution, DamageResult, DamageSeverity, DamageTypes,
    ResistanceProfile,
};
pub use death_move::{
    resolve_death_move, DeathMove, DeathMoveInput, DeathMoveOutcome, LifeState, RiskItAllSplit,
};
pub use dice::{roll_checked, DiceRoller, ManualDice, RollRequest, D12, D20, D4};
pub use downtime::DowntimeMove;
pub use loadout::{DomainCard, Loadout, LoadoutZone, RecallOutcome, ACTIVE_CAPACITY};
pub use resources::{
    CampaignResource, CampaignResources, CharacterResource, CharacterResources, ResourceChange,
    ResourceHolder, StressGain,
};
pub use rest::{
    resolve_rest, ArmorDuration, RefreshEffect, RefreshScope, RestInput, RestOutcome, RestType,
    SHORT_REST_CAP,
};

use super::traits::GameSystem;

/// Absolute HP cap for a character.
pub const HP_CAP: i32 = 12;
/// Absolute Hope cap (and the ceiling for HopeMax).
pub const HOPE_CAP: i32 = 6;
/// Default HopeMax for a fresh character.
pub const HOPE_MAX_DEFAULT: i32 = 6;
/// Lowest HopeMax a character can be scarred down to.
pub const HOPE_MAX_FLOOR: i32 = 0;
/// Absolute Stress cap for a character.
pub const STRESS_CAP: i32 = 12;
/// Absolute Armor cap for a character.
pub const ARMOR_CAP: i32 = 12;
/// Absolute GM Fear cap for a campaign.
pub const GM_FEAR_CAP: i32 = 12;

/// Check a value against an inclusive range, naming the field in the error.
pub fn ensure_range(
    field: &str,
    value: i32,
    min: i32,
    max: i32,
) -> Result<(), crate::error::DomainError> {
    if value < min || value > max {
        return Err(crate::error::DomainError::validation(format!(
            "{field} must be in range {min}..={max}, got {value}"
        )));
    }
    Ok(())
}

/// Daggerheart game system.
#[derive(Debug, Clone, Default)]
pub struct DaggerheartSystem;

impl DaggerheartSystem {
    pub const SYSTEM_ID: &'static str = "daggerheart";
    pub const SYSTEM_VERSION: &'static str = "1.0.0";

    pub fn new() -> Self {
        Self
    }
}

impl GameSystem for DaggerheartSystem {
    fn system_id(&self) -> &str {
        Self::SYSTEM_ID
    }

    fn display_name(&self) -> &str {
        "Daggerheart"
    }

    fn system_version(&self) -> &str {
        Self::SYSTEM_VERSION
    }

    fn resource_names(&self) -> &[&str] {
        &["hp", "hope", "stress", "armor", "gm_fear"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_identification() {
        let system = DaggerheartSystem::new();
        assert_eq!(system.system_id(), "daggerheart");
        assert_eq!(system.display_name(), "Daggerheart");
        assert_eq!(system.system_version(), "1.0.0");
        assert!(system.resource_names().contains(&"gm_fear"));
    }

    #[test]
    fn ensure_range_names_the_field() {
        assert!(ensure_range("hp_after", 12, 0, HP_CAP).is_ok());
        let err = ensure_range("hp_after", 13, 0, HP_CAP).unwrap_err();
        assert!(err.to_string().contains("hp_after"));
    }
}
