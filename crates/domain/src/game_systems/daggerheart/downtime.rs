//! Downtime moves taken during a rest.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::resources::{CharacterResource, CharacterResources, ResourceChange, ResourceHolder};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DowntimeMove {
    /// Clear all marked HP.
    TendToAllWounds,
    /// Clear all Stress.
    ClearAllStress,
    /// Restore every Armor slot.
    RepairAllArmor,
    /// Gain Hope (two when preparing with the party).
    Prepare,
}

impl DowntimeMove {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TendToAllWounds => "tend_to_all_wounds",
            Self::ClearAllStress => "clear_all_stress",
            Self::RepairAllArmor => "repair_all_armor",
            Self::Prepare => "prepare",
        }
    }

    pub const fn resource(&self) -> CharacterResource {
        match self {
            Self::TendToAllWounds => CharacterResource::Hp,
            Self::ClearAllStress => CharacterResource::Stress,
            Self::RepairAllArmor => CharacterResource::Armor,
            Self::Prepare => CharacterResource::Hope,
        }
    }

    /// Apply the move. Returns the change to the one resource it touches.
    pub fn apply(&self, resources: &mut CharacterResources, with_party: bool) -> ResourceChange {
        match self {
            Self::TendToAllWounds => resources.set(CharacterResource::Hp, resources.hp_max()),
            Self::ClearAllStress => resources.set(CharacterResource::Stress, 0),
            Self::RepairAllArmor => {
                resources.set(CharacterResource::Armor, resources.armor_max())
            }
            Self::Prepare => {
                let gain = if with_party { 2 } else { 1 };
                resources.set(CharacterResource::Hope, resources.hope() + gain)
            }
        }
    }
}

impl fmt::Display for DowntimeMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DowntimeMove {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tend_to_all_wounds" => Ok(Self::TendToAllWounds),
            "clear_all_stress" => Ok(Self::ClearAllStress),
            "repair_all_armor" => Ok(Self::RepairAllArmor),
            "prepare" => Ok(Self::Prepare),
            other => Err(DomainError::parse(format!("Unknown downtime move: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worn() -> CharacterResources {
        CharacterResources::new()
            .with_maximums(8, 6, 3)
            .with_values(2, 1, 5, 0)
    }

    #[test]
    fn tend_restores_hp_to_max() {
        let mut res = worn();
        let change = DowntimeMove::TendToAllWounds.apply(&mut res, false);
        assert_eq!(change, ResourceChange::new(2, 8));
    }

    #[test]
    fn clear_and_repair() {
        let mut res = worn();
        assert_eq!(DowntimeMove::ClearAllStress.apply(&mut res, false).after, 0);
        assert_eq!(DowntimeMove::RepairAllArmor.apply(&mut res, false).after, 3);
    }

    #[test]
    fn prepare_with_party_gains_two_hope() {
        let mut res = worn();
        assert_eq!(DowntimeMove::Prepare.apply(&mut res, true), ResourceChange::new(1, 3));
        assert_eq!(DowntimeMove::Prepare.apply(&mut res, false).after, 4);
    }

    #[test]
    fn parses_move_names() {
        assert_eq!(
            "clear_all_stress".parse::<DowntimeMove>().unwrap(),
            DowntimeMove::ClearAllStress
        );
        assert!("nap".parse::<DowntimeMove>().is_err());
    }
}
