//! Death moves.
//!
//! When a character drops to 0 HP the player picks one of three moves:
//! - Blaze of Glory: one last heroic action, then the character is gone
//! - Avoid Death: fall unconscious, and risk a permanent scar on Hope
//! - Risk It All: roll Hope against Fear; live, die, or come back whole

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::dice::{roll_checked, DiceRoller, RollRequest, D12};
use super::resources::{CharacterResource, CharacterResources, ResourceHolder};
use super::{HOPE_CAP, HOPE_MAX_FLOOR};
use crate::error::DomainError;

/// Mortality status of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeState {
    #[default]
    Alive,
    Unconscious,
    BlazeOfGlory,
    Dead,
}

impl LifeState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alive => "alive",
            Self::Unconscious => "unconscious",
            Self::BlazeOfGlory => "blaze_of_glory",
            Self::Dead => "dead",
        }
    }
}

impl fmt::Display for LifeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifeState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alive" => Ok(Self::Alive),
            "unconscious" => Ok(Self::Unconscious),
            "blaze_of_glory" => Ok(Self::BlazeOfGlory),
            "dead" => Ok(Self::Dead),
            other => Err(DomainError::parse(format!("Unknown life state: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathMove {
    BlazeOfGlory,
    AvoidDeath,
    RiskItAll,
}

impl DeathMove {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BlazeOfGlory => "blaze_of_glory",
            Self::AvoidDeath => "avoid_death",
            Self::RiskItAll => "risk_it_all",
        }
    }

    /// Whether the move rolls dice (and so needs a roll sequence).
    pub const fn uses_dice(&self) -> bool {
        !matches!(self, Self::BlazeOfGlory)
    }
}

impl fmt::Display for DeathMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeathMove {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blaze_of_glory" => Ok(Self::BlazeOfGlory),
            "avoid_death" => Ok(Self::AvoidDeath),
            "risk_it_all" => Ok(Self::RiskItAll),
            other => Err(DomainError::parse(format!("Unknown death move: {other}"))),
        }
    }
}

/// How a successful Risk It All budget is divided between HP and Stress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskItAllSplit {
    pub hp_clear: i32,
    pub stress_clear: i32,
}

impl RiskItAllSplit {
    /// Resolve caller overrides against the Hope die.
    ///
    /// With no overrides the whole budget goes to HP. If only one override is
    /// given the other is 0.
    pub fn resolve(
        budget: i32,
        hp_clear: Option<i32>,
        stress_clear: Option<i32>,
    ) -> Result<Self, DomainError> {
        if hp_clear.is_none() && stress_clear.is_none() {
            return Ok(Self {
                hp_clear: budget,
                stress_clear: 0,
            });
        }
        let split = Self {
            hp_clear: hp_clear.unwrap_or(0),
            stress_clear: stress_clear.unwrap_or(0),
        };
        if split.hp_clear < 0 || split.stress_clear < 0 {
            return Err(DomainError::validation("risk it all clears must be non-negative"));
        }
        if split.hp_clear + split.stress_clear > budget {
            return Err(DomainError::validation(format!(
                "risk it all clears {} + {} exceed hope die {budget}",
                split.hp_clear, split.stress_clear
            )));
        }
        Ok(split)
    }
}

/// Character state going into a death move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathMoveInput {
    pub level: i32,
    pub hp: i32,
    pub hp_max: i32,
    pub hope: i32,
    pub hope_max: i32,
    pub stress: i32,
    pub stress_max: i32,
    pub hp_clear: Option<i32>,
    pub stress_clear: Option<i32>,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathMoveOutcome {
    pub death_move: DeathMove,
    pub life_state: LifeState,
    pub hope_die: Option<u8>,
    pub fear_die: Option<u8>,
    pub hp_before: i32,
    pub hp_after: i32,
    pub hope_before: i32,
    pub hope_after: i32,
    pub hope_max_before: i32,
    pub hope_max_after: i32,
    pub stress_before: i32,
    pub stress_after: i32,
    /// Avoid Death cost a point of HopeMax.
    pub scarred: bool,
    /// Split applied on a Risk It All success.
    pub split: Option<RiskItAllSplit>,
}

fn validate_input(input: &DeathMoveInput) -> Result<(), DomainError> {
    if input.level < 1 {
        return Err(DomainError::validation(format!(
            "level must be at least 1, got {}",
            input.level
        )));
    }
    if input.hp_max < 0 || input.stress_max < 0 {
        return Err(DomainError::validation("hp_max and stress_max must be non-negative"));
    }
    if input.hope_max < HOPE_MAX_FLOOR || input.hope_max > HOPE_CAP {
        return Err(DomainError::validation(format!(
            "hope_max must be in range {HOPE_MAX_FLOOR}..={HOPE_CAP}, got {}",
            input.hope_max
        )));
    }
    Ok(())
}

/// Resolve a death move. Dice come from `roller` with `input.seed`.
pub fn resolve_death_move(
    death_move: DeathMove,
    input: DeathMoveInput,
    roller: &dyn DiceRoller,
) -> Result<DeathMoveOutcome, DomainError> {
    validate_input(&input)?;

    let mut res = CharacterResources::new()
        .with_maximums(input.hp_max, input.stress_max, 0)
        .with_hope_max(input.hope_max)
        .with_values(input.hp, input.hope, input.stress, 0);
    let (hp_before, hope_before, hope_max_before, stress_before) =
        (res.hp(), res.hope(), res.hope_max(), res.stress());

    let mut outcome = DeathMoveOutcome {
        death_move,
        life_state: LifeState::Alive,
        hope_die: None,
        fear_die: None,
        hp_before,
        hp_after: hp_before,
        hope_before,
        hope_after: hope_before,
        hope_max_before,
        hope_max_after: hope_max_before,
        stress_before,
        stress_after: stress_before,
        scarred: false,
        split: None,
    };

    match death_move {
        DeathMove::BlazeOfGlory => {
            outcome.life_state = LifeState::BlazeOfGlory;
        }
        DeathMove::AvoidDeath => {
            let dice = roll_checked(roller, input.seed, RollRequest::new(D12, 1))?;
            let hope_die = dice[0];
            outcome.hope_die = Some(hope_die);
            outcome.life_state = LifeState::Unconscious;
            if i32::from(hope_die) <= input.level {
                res.set_hope_max(res.hope_max() - 1);
                outcome.scarred = true;
            }
        }
        DeathMove::RiskItAll => {
            let dice = roll_checked(roller, input.seed, RollRequest::new(D12, 2))?;
            let (hope_die, fear_die) = (dice[0], dice[1]);
            outcome.hope_die = Some(hope_die);
            outcome.fear_die = Some(fear_die);

            if hope_die > fear_die {
                let split =
                    RiskItAllSplit::resolve(i32::from(hope_die), input.hp_clear, input.stress_clear)?;
                res.set(CharacterResource::Hp, res.hp() + split.hp_clear);
                res.set(CharacterResource::Stress, res.stress() - split.stress_clear);
                outcome.life_state = LifeState::Alive;
                outcome.split = Some(split);
            } else if fear_die > hope_die {
                outcome.life_state = LifeState::Dead;
            } else {
                res.set(CharacterResource::Hp, res.hp_max());
                res.set(CharacterResource::Stress, res.stress_max());
                outcome.life_state = LifeState::Alive;
            }
        }
    }

    outcome.hp_after = res.hp();
    outcome.hope_after = res.hope();
    outcome.hope_max_after = res.hope_max();
    outcome.stress_after = res.stress();
    Ok(outcome)
}
