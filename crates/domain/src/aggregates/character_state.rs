//! Per-character resource projection.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::game_systems::daggerheart::{
    ensure_range, normalize_conditions, ArmorDuration, CharacterResources, Condition, LifeState,
    ARMOR_CAP, HOPE_CAP, HOPE_MAX_DEFAULT, HOPE_MAX_FLOOR, HP_CAP, STRESS_CAP,
};
use crate::ids::{CampaignId, CharacterId};

/// An expiring armor grant (a spell, a consumable, a class feature).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryArmorBucket {
    pub source: String,
    pub duration: ArmorDuration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub amount: i32,
}

impl TemporaryArmorBucket {
    /// Buckets are keyed by source and source id.
    pub fn same_grant(&self, other: &TemporaryArmorBucket) -> bool {
        self.source == other.source && self.source_id == other.source_id
    }
}

/// Current maxima from the character's sheet. Character lifecycle lives
/// outside this crate, so callers supply them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub hp_max: i32,
    pub stress_max: i32,
    pub armor_max: i32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            hp_max: HP_CAP,
            stress_max: STRESS_CAP,
            armor_max: ARMOR_CAP,
        }
    }
}

/// Resource snapshot for one character in one campaign.
///
/// # Invariants
///
/// - `hp`, `stress`, `armor` stay within their absolute caps
/// - `hope_max` stays in `[HOPE_MAX_FLOOR, HOPE_CAP]` and `hope <= hope_max`
/// - `conditions` is normalized (deduplicated, canonical order)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterState {
    pub campaign_id: CampaignId,
    pub character_id: CharacterId,
    pub hp: i32,
    pub hope: i32,
    pub hope_max: i32,
    pub stress: i32,
    pub armor: i32,
    #[serde(default)]
    pub temporary_armor: Vec<TemporaryArmorBucket>,
    #[serde(default)]
    pub life_state: LifeState,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl CharacterState {
    /// Zero-valued state used when no row exists yet.
    pub fn new(campaign_id: CampaignId, character_id: CharacterId) -> Self {
        Self {
            campaign_id,
            character_id,
            hp: 0,
            hope: 0,
            hope_max: HOPE_MAX_DEFAULT,
            stress: 0,
            armor: 0,
            temporary_armor: Vec::new(),
            life_state: LifeState::Alive,
            conditions: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_range("hp", self.hp, 0, HP_CAP)?;
        ensure_range("hope_max", self.hope_max, HOPE_MAX_FLOOR, HOPE_CAP)?;
        ensure_range("hope", self.hope, 0, self.hope_max)?;
        ensure_range("stress", self.stress, 0, STRESS_CAP)?;
        ensure_range("armor", self.armor, 0, ARMOR_CAP)?;
        for bucket in &self.temporary_armor {
            if bucket.source.trim().is_empty() {
                return Err(DomainError::validation("temporary armor source is required"));
            }
            ensure_range("temporary armor amount", bucket.amount, 1, ARMOR_CAP)?;
        }
        let names: Vec<&str> = self.conditions.iter().map(Condition::as_str).collect();
        if normalize_conditions(&names)? != self.conditions {
            return Err(DomainError::validation("conditions must be normalized"));
        }
        Ok(())
    }

    /// Change HopeMax, pulling Hope down with it.
    pub fn set_hope_max(&mut self, hope_max: i32) {
        self.hope_max = hope_max.clamp(HOPE_MAX_FLOOR, HOPE_CAP);
        self.hope = self.hope.min(self.hope_max);
    }

    /// Resource model view under the given maxima.
    pub fn resources(&self, limits: ResourceLimits) -> CharacterResources {
        CharacterResources::new()
            .with_maximums(limits.hp_max, limits.stress_max, limits.armor_max)
            .with_hope_max(self.hope_max)
            .with_values(self.hp, self.hope, self.stress, self.armor)
    }

    pub fn temporary_armor_total(&self) -> i32 {
        self.temporary_armor.iter().map(|b| b.amount).sum()
    }

    /// Insert a bucket, replacing any earlier grant from the same source.
    pub fn upsert_temporary_armor(&mut self, bucket: TemporaryArmorBucket) {
        match self.temporary_armor.iter_mut().find(|b| b.same_grant(&bucket)) {
            Some(existing) => *existing = bucket,
            None => self.temporary_armor.push(bucket),
        }
    }

    /// Drop buckets matching `expired` and return the armor they granted.
    pub fn expire_temporary_armor(&mut self, expired: impl Fn(ArmorDuration) -> bool) -> i32 {
        let mut removed = 0;
        self.temporary_armor.retain(|b| {
            if expired(b.duration) {
                removed += b.amount;
                false
            } else {
                true
            }
        });
        removed
    }
}
