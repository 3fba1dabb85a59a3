//! Daggerheart commands.
//!
//! Commands are requests; the [`decide`] function turns one into the events
//! to append, using the current projections in a [`DecisionState`]. Unknown
//! command types never decode.

mod decider;

pub use decider::{decide, DecideOptions, DecisionState};

use serde::{Deserialize, Serialize};

use crate::aggregates::ResourceLimits;
use crate::error::DomainError;
use crate::game_systems::daggerheart::{
    ArmorDuration, CharacterResource, DamageTypes, DeathMove, DomainCard, DowntimeMove,
    LoadoutZone, RefreshEffect, ResistanceProfile, RestType,
};
use crate::ids::{AdversaryId, CharacterId, CountdownId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyDamageCommand {
    pub character_id: String,
    pub amount: i32,
    #[serde(default)]
    pub types: DamageTypes,
    #[serde(default)]
    pub resistance: ResistanceProfile,
    pub major_threshold: i32,
    pub severe_threshold: i32,
    #[serde(default)]
    pub use_armor: bool,
    #[serde(default)]
    pub limits: ResourceLimits,
    #[serde(default)]
    pub roll_seq: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyAdversaryDamageCommand {
    pub adversary_id: String,
    pub amount: i32,
    #[serde(default)]
    pub types: DamageTypes,
    #[serde(default)]
    pub resistance: ResistanceProfile,
    #[serde(default)]
    pub use_armor: bool,
    #[serde(default)]
    pub roll_seq: Option<u64>,
}

/// Gain or spend on one character resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCommand {
    pub character_id: String,
    pub resource: CharacterResource,
    pub amount: i32,
    #[serde(default)]
    pub limits: ResourceLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeGmFearCommand {
    /// Positive gains Fear, negative spends it.
    pub delta: i32,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTarget {
    Character(String),
    Adversary(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeConditionsCommand {
    pub target: ConditionTarget,
    /// The full condition set after the change.
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveDeathMoveCommand {
    pub character_id: String,
    #[serde(rename = "move")]
    pub death_move: DeathMove,
    pub level: i32,
    #[serde(default)]
    pub limits: ResourceLimits,
    #[serde(default)]
    pub hp_clear: Option<i32>,
    #[serde(default)]
    pub stress_clear: Option<i32>,
    #[serde(default)]
    pub roll_seq: Option<u64>,
    /// Dice seed. Defaults to the roll sequence.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeRestCommand {
    pub rest_type: RestType,
    #[serde(default)]
    pub interrupted: bool,
    /// Characters taking the rest.
    #[serde(default)]
    pub party: Vec<String>,
    #[serde(default)]
    pub refresh_effects: Vec<RefreshEffect>,
    #[serde(default)]
    pub long_term_countdown_id: Option<String>,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyDowntimeMoveCommand {
    pub character_id: String,
    #[serde(rename = "move")]
    pub downtime_move: DowntimeMove,
    #[serde(default)]
    pub with_party: bool,
    #[serde(default)]
    pub limits: ResourceLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapLoadoutCommand {
    pub character_id: String,
    pub card_id: String,
    pub to: LoadoutZone,
    /// Current loadout as held by the character sheet.
    #[serde(default)]
    pub active: Vec<DomainCard>,
    #[serde(default)]
    pub vault: Vec<DomainCard>,
    #[serde(default)]
    pub at_rest: bool,
    #[serde(default)]
    pub limits: ResourceLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyTemporaryArmorCommand {
    pub character_id: String,
    pub source: String,
    pub duration: ArmorDuration,
    #[serde(default)]
    pub source_id: Option<String>,
    pub amount: i32,
    #[serde(default)]
    pub limits: ResourceLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCountdownCommand {
    pub countdown_id: String,
    #[serde(default)]
    pub delta: Option<i32>,
    /// Set the value outright. Wins over `delta`.
    #[serde(default)]
    pub value: Option<i32>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Every command this system accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaggerheartCommand {
    ApplyDamage(ApplyDamageCommand),
    ApplyAdversaryDamage(ApplyAdversaryDamageCommand),
    GainResource(ResourceCommand),
    SpendResource(ResourceCommand),
    ChangeGmFear(ChangeGmFearCommand),
    ChangeConditions(ChangeConditionsCommand),
    ResolveDeathMove(ResolveDeathMoveCommand),
    TakeRest(TakeRestCommand),
    ApplyDowntimeMove(ApplyDowntimeMoveCommand),
    SwapLoadout(SwapLoadoutCommand),
    ApplyTemporaryArmor(ApplyTemporaryArmorCommand),
    UpdateCountdown(UpdateCountdownCommand),
}

/// Command type names on the wire.
pub const COMMAND_TYPES: &[&str] = &[
    "apply_damage",
    "apply_adversary_damage",
    "gain_resource",
    "spend_resource",
    "change_gm_fear",
    "change_conditions",
    "resolve_death_move",
    "take_rest",
    "apply_downtime_move",
    "swap_loadout",
    "apply_temporary_armor",
    "update_countdown",
];

/// Projections a command reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub characters: Vec<CharacterId>,
    pub adversaries: Vec<AdversaryId>,
    pub countdowns: Vec<CountdownId>,
}

impl DaggerheartCommand {
    /// Decode a command. `Ok(None)` means the type is not a Daggerheart
    /// command at all.
    pub fn parse(
        command_type: &str,
        payload: serde_json::Value,
    ) -> Result<Option<Self>, serde_json::Error> {
        use serde_json::from_value;
        Ok(Some(match command_type {
            "apply_damage" => Self::ApplyDamage(from_value(payload)?),
            "apply_adversary_damage" => Self::ApplyAdversaryDamage(from_value(payload)?),
            "gain_resource" => Self::GainResource(from_value(payload)?),
            "spend_resource" => Self::SpendResource(from_value(payload)?),
            "change_gm_fear" => Self::ChangeGmFear(from_value(payload)?),
            "change_conditions" => Self::ChangeConditions(from_value(payload)?),
            "resolve_death_move" => Self::ResolveDeathMove(from_value(payload)?),
            "take_rest" => Self::TakeRest(from_value(payload)?),
            "apply_downtime_move" => Self::ApplyDowntimeMove(from_value(payload)?),
            "swap_loadout" => Self::SwapLoadout(from_value(payload)?),
            "apply_temporary_armor" => Self::ApplyTemporaryArmor(from_value(payload)?),
            "update_countdown" => Self::UpdateCountdown(from_value(payload)?),
            _ => return Ok(None),
        }))
    }

    pub fn command_type(&self) -> &'static str {
        match self {
            Self::ApplyDamage(_) => "apply_damage",
            Self::ApplyAdversaryDamage(_) => "apply_adversary_damage",
            Self::GainResource(_) => "gain_resource",
            Self::SpendResource(_) => "spend_resource",
            Self::ChangeGmFear(_) => "change_gm_fear",
            Self::ChangeConditions(_) => "change_conditions",
            Self::ResolveDeathMove(_) => "resolve_death_move",
            Self::TakeRest(_) => "take_rest",
            Self::ApplyDowntimeMove(_) => "apply_downtime_move",
            Self::SwapLoadout(_) => "swap_loadout",
            Self::ApplyTemporaryArmor(_) => "apply_temporary_armor",
            Self::UpdateCountdown(_) => "update_countdown",
        }
    }

    /// Ids of the projections `decide` will look at.
    pub fn dependencies(&self) -> Result<Dependencies, DomainError> {
        let mut deps = Dependencies::default();
        match self {
            Self::ApplyDamage(c) => deps.characters.push(CharacterId::new(&c.character_id)?),
            Self::ApplyAdversaryDamage(c) => {
                deps.adversaries.push(AdversaryId::new(&c.adversary_id)?)
            }
            Self::GainResource(c) | Self::SpendResource(c) => {
                deps.characters.push(CharacterId::new(&c.character_id)?)
            }
            Self::ChangeGmFear(_) => {}
            Self::ChangeConditions(c) => match &c.target {
                ConditionTarget::Character(id) => deps.characters.push(CharacterId::new(id)?),
                ConditionTarget::Adversary(id) => deps.adversaries.push(AdversaryId::new(id)?),
            },
            Self::ResolveDeathMove(c) => deps.characters.push(CharacterId::new(&c.character_id)?),
            Self::TakeRest(c) => {
                for id in &c.party {
                    deps.characters.push(CharacterId::new(id)?);
                }
                if let Some(id) = &c.long_term_countdown_id {
                    deps.countdowns.push(CountdownId::new(id)?);
                }
            }
            Self::ApplyDowntimeMove(c) => {
                deps.characters.push(CharacterId::new(&c.character_id)?)
            }
            Self::SwapLoadout(c) => deps.characters.push(CharacterId::new(&c.character_id)?),
            Self::ApplyTemporaryArmor(c) => {
                deps.characters.push(CharacterId::new(&c.character_id)?)
            }
            Self::UpdateCountdown(c) => deps.countdowns.push(CountdownId::new(&c.countdown_id)?),
        }
        Ok(deps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_known_command() {
        let command = DaggerheartCommand::parse(
            "change_gm_fear",
            json!({"delta": 2, "reason": "spotlight"}),
        )
        .unwrap()
        .unwrap();
        assert_eq!(command.command_type(), "change_gm_fear");
    }

    #[test]
    fn parse_unknown_command_is_none() {
        assert_eq!(
            DaggerheartCommand::parse("summon_dragon", json!({})).unwrap(),
            None
        );
    }

    #[test]
    fn every_listed_type_round_trips() {
        for name in COMMAND_TYPES {
            // Bad payloads still prove the type is recognised.
            let parsed = DaggerheartCommand::parse(name, json!({}));
            assert!(!matches!(parsed, Ok(None)), "{name} not recognised");
        }
    }

    #[test]
    fn dependencies_validate_ids() {
        let command = DaggerheartCommand::parse(
            "update_countdown",
            json!({"countdown_id": "  ", "delta": 1}),
        )
        .unwrap()
        .unwrap();
        assert!(matches!(
            command.dependencies(),
            Err(DomainError::InvalidId(_))
        ));
    }

    #[test]
    fn rest_depends_on_party_and_countdown() {
        let command = DaggerheartCommand::parse(
            "take_rest",
            json!({
                "rest_type": "long",
                "party": ["a", "b"],
                "long_term_countdown_id": "campaign_clock",
                "seed": 7
            }),
        )
        .unwrap()
        .unwrap();
        let deps = command.dependencies().unwrap();
        assert_eq!(deps.characters.len(), 2);
        assert_eq!(deps.countdowns.len(), 1);
    }
}
