//! Domain card loadout: up to five active cards, the rest in the vault.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::resources::{CharacterResource, CharacterResources, ResourceChange, ResourceHolder};
use crate::error::DomainError;
use crate::ids::CardId;

/// Maximum number of active cards.
pub const ACTIVE_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadoutZone {
    Active,
    Vault,
}

impl LoadoutZone {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Vault => "vault",
        }
    }
}

impl fmt::Display for LoadoutZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadoutZone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "vault" => Ok(Self::Vault),
            other => Err(DomainError::parse(format!("Unknown loadout zone: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCard {
    pub id: CardId,
    #[serde(default)]
    pub name: String,
    /// Stress paid to bring the card back from the vault outside a rest.
    #[serde(default)]
    pub recall_cost: i32,
}

impl DomainCard {
    pub fn new(id: CardId, recall_cost: i32) -> Self {
        Self {
            id,
            name: String::new(),
            recall_cost,
        }
    }
}

/// What a recall cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecallOutcome {
    pub card_id: CardId,
    pub recall_cost: i32,
    /// Stress change, when the cost was paid.
    pub stress: Option<ResourceChange>,
}

/// Active and vault lists. A card lives in exactly one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    active: Vec<DomainCard>,
    vault: Vec<DomainCard>,
}

impl Loadout {
    pub fn new(active: Vec<DomainCard>, vault: Vec<DomainCard>) -> Result<Self, DomainError> {
        if active.len() > ACTIVE_CAPACITY {
            return Err(DomainError::LoadoutFull {
                capacity: ACTIVE_CAPACITY,
            });
        }
        let mut seen = HashSet::new();
        for card in active.iter().chain(vault.iter()) {
            if !seen.insert(&card.id) {
                return Err(DomainError::DuplicateCard(card.id.to_string()));
            }
            if card.recall_cost < 0 {
                return Err(DomainError::validation(format!(
                    "recall cost for {} must be non-negative",
                    card.id
                )));
            }
        }
        Ok(Self { active, vault })
    }

    pub fn active(&self) -> &[DomainCard] {
        &self.active
    }

    pub fn vault(&self) -> &[DomainCard] {
        &self.vault
    }

    pub fn zone_of(&self, card_id: &CardId) -> Option<LoadoutZone> {
        if self.active.iter().any(|c| &c.id == card_id) {
            Some(LoadoutZone::Active)
        } else if self.vault.iter().any(|c| &c.id == card_id) {
            Some(LoadoutZone::Vault)
        } else {
            None
        }
    }

    pub fn card(&self, card_id: &CardId) -> Option<&DomainCard> {
        self.active
            .iter()
            .chain(self.vault.iter())
            .find(|c| &c.id == card_id)
    }

    pub fn move_to_active(&mut self, card_id: &CardId) -> Result<(), DomainError> {
        let index = self.vault_index(card_id)?;
        self.ensure_active_room()?;
        let card = self.vault.remove(index);
        self.active.push(card);
        Ok(())
    }

    pub fn move_to_vault(&mut self, card_id: &CardId) -> Result<(), DomainError> {
        let index = self
            .active
            .iter()
            .position(|c| &c.id == card_id)
            .ok_or_else(|| DomainError::CardNotFound(card_id.to_string()))?;
        let card = self.active.remove(index);
        self.vault.push(card);
        Ok(())
    }

    /// Move a vault card to active, paying its recall cost in Stress unless
    /// the character is resting. Nothing changes if any step fails.
    pub fn move_to_active_with_recall(
        &mut self,
        card_id: &CardId,
        resources: &mut CharacterResources,
        at_rest: bool,
    ) -> Result<RecallOutcome, DomainError> {
        let index = self.vault_index(card_id)?;
        self.ensure_active_room()?;
        let recall_cost = self.vault[index].recall_cost;

        let stress = if !at_rest && recall_cost > 0 {
            Some(resources.spend(CharacterResource::Stress, recall_cost)?)
        } else {
            None
        };

        let card = self.vault.remove(index);
        self.active.push(card);
        Ok(RecallOutcome {
            card_id: card_id.clone(),
            recall_cost,
            stress,
        })
    }

    fn vault_index(&self, card_id: &CardId) -> Result<usize, DomainError> {
        self.vault
            .iter()
            .position(|c| &c.id == card_id)
            .ok_or_else(|| DomainError::CardNotFound(card_id.to_string()))
    }

    fn ensure_active_room(&self) -> Result<(), DomainError> {
        if self.active.len() >= ACTIVE_CAPACITY {
            return Err(DomainError::LoadoutFull {
                capacity: ACTIVE_CAPACITY,
            });
        }
        Ok(())
    }
}
