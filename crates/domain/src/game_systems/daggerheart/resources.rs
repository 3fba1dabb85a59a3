//! Resource model - bounded pools with clamped get/set/gain/spend.
//!
//! Characters carry HP, Hope, Stress and Armor; a campaign carries GM Fear.
//! Every pool has a floor of 0 and a current maximum that never exceeds the
//! pool's absolute cap. Operations take `&mut self` and leave the holder
//! untouched when they fail.
//!
//! Stress is special: gaining past its maximum spills the excess into HP
//! damage, one HP per point of overflow.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ARMOR_CAP, GM_FEAR_CAP, HOPE_CAP, HOPE_MAX_DEFAULT, HOPE_MAX_FLOOR, HP_CAP, STRESS_CAP};
use crate::error::DomainError;

/// Before/after pair reported by every resource operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceChange {
    pub before: i32,
    pub after: i32,
}

impl ResourceChange {
    pub const fn new(before: i32, after: i32) -> Self {
        Self { before, after }
    }

    /// Signed change (`after - before`).
    pub const fn delta(&self) -> i32 {
        self.after - self.before
    }

    pub const fn is_unchanged(&self) -> bool {
        self.before == self.after
    }
}

/// A holder of bounded resources.
///
/// Implementors describe storage and bounds; the clamping rules live in the
/// provided methods so every pool behaves the same way.
pub trait ResourceHolder {
    type Kind: Copy + fmt::Debug;

    /// Stable snake_case name, used in errors.
    fn resource_name(kind: Self::Kind) -> &'static str;

    fn current(&self, kind: Self::Kind) -> i32;

    /// Current upper bound for the pool.
    fn maximum(&self, kind: Self::Kind) -> i32;

    fn minimum(&self, _kind: Self::Kind) -> i32 {
        0
    }

    fn store(&mut self, kind: Self::Kind, value: i32);

    fn get(&self, kind: Self::Kind) -> i32 {
        self.current(kind)
    }

    /// Set a pool, clamping into `[minimum, maximum]`.
    fn set(&mut self, kind: Self::Kind, value: i32) -> ResourceChange {
        let before = self.current(kind);
        let after = value.clamp(self.minimum(kind), self.maximum(kind));
        self.store(kind, after);
        ResourceChange::new(before, after)
    }

    /// Add to a pool, stopping at its maximum.
    fn gain(&mut self, kind: Self::Kind, amount: i32) -> Result<ResourceChange, DomainError> {
        gain_up_to_maximum(self, kind, amount)
    }

    /// Take from a pool; fails without mutating when the pool is too small.
    fn spend(&mut self, kind: Self::Kind, amount: i32) -> Result<ResourceChange, DomainError> {
        if amount < 0 {
            return Err(DomainError::validation(format!(
                "{} spend must be non-negative, got {amount}",
                Self::resource_name(kind)
            )));
        }
        let before = self.current(kind);
        if amount > before {
            return Err(DomainError::insufficient(
                Self::resource_name(kind),
                amount,
                before,
            ));
        }
        let after = before - amount;
        self.store(kind, after);
        Ok(ResourceChange::new(before, after))
    }
}

fn gain_up_to_maximum<H: ResourceHolder + ?Sized>(
    holder: &mut H,
    kind: H::Kind,
    amount: i32,
) -> Result<ResourceChange, DomainError> {
    if amount < 0 {
        return Err(DomainError::validation(format!(
            "{} gain must be non-negative, got {amount}",
            H::resource_name(kind)
        )));
    }
    let before = holder.current(kind);
    let after = before.saturating_add(amount).min(holder.maximum(kind));
    holder.store(kind, after);
    Ok(ResourceChange::new(before, after))
}

// ============================================================================
// Character resources
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterResource {
    Hp,
    Hope,
    Stress,
    Armor,
}

impl CharacterResource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hp => "hp",
            Self::Hope => "hope",
            Self::Stress => "stress",
            Self::Armor => "armor",
        }
    }
}

impl std::str::FromStr for CharacterResource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hp" => Ok(Self::Hp),
            "hope" => Ok(Self::Hope),
            "stress" => Ok(Self::Stress),
            "armor" => Ok(Self::Armor),
            other => Err(DomainError::parse(format!("Unknown character resource: {other}"))),
        }
    }
}

impl fmt::Display for CharacterResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a Stress gain, including any spill into HP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressGain {
    pub stress: ResourceChange,
    pub hp: ResourceChange,
    /// Points of Stress that did not fit and were taken from HP instead.
    pub overflow: i32,
    /// The gain left Stress exactly at its maximum.
    pub filled_to_max: bool,
}

/// A character's four resource pools with their current maxima.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterResources {
    hp: i32,
    hp_max: i32,
    hope: i32,
    hope_max: i32,
    stress: i32,
    stress_max: i32,
    armor: i32,
    armor_max: i32,
}

impl Default for CharacterResources {
    fn default() -> Self {
        Self {
            hp: 0,
            hp_max: HP_CAP,
            hope: 0,
            hope_max: HOPE_MAX_DEFAULT,
            stress: 0,
            stress_max: STRESS_CAP,
            armor: 0,
            armor_max: ARMOR_CAP,
        }
    }
}

impl CharacterResources {
    /// Pools at the absolute caps with every current value at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maxima; each is clamped to its absolute cap and currents are
    /// re-clamped under the new bounds.
    pub fn with_maximums(mut self, hp_max: i32, stress_max: i32, armor_max: i32) -> Self {
        self.hp_max = hp_max.clamp(0, HP_CAP);
        self.stress_max = stress_max.clamp(0, STRESS_CAP);
        self.armor_max = armor_max.clamp(0, ARMOR_CAP);
        self.hp = self.hp.clamp(0, self.hp_max);
        self.stress = self.stress.clamp(0, self.stress_max);
        self.armor = self.armor.clamp(0, self.armor_max);
        self
    }

    pub fn with_hope_max(mut self, hope_max: i32) -> Self {
        self.set_hope_max(hope_max);
        self
    }

    pub fn with_values(mut self, hp: i32, hope: i32, stress: i32, armor: i32) -> Self {
        self.set(CharacterResource::Hp, hp);
        self.set(CharacterResource::Hope, hope);
        self.set(CharacterResource::Stress, stress);
        self.set(CharacterResource::Armor, armor);
        self
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn hp_max(&self) -> i32 {
        self.hp_max
    }

    pub fn hope(&self) -> i32 {
        self.hope
    }

    pub fn hope_max(&self) -> i32 {
        self.hope_max
    }

    pub fn stress(&self) -> i32 {
        self.stress
    }

    pub fn stress_max(&self) -> i32 {
        self.stress_max
    }

    pub fn armor(&self) -> i32 {
        self.armor
    }

    pub fn armor_max(&self) -> i32 {
        self.armor_max
    }

    /// Change HopeMax, clamped to `[HOPE_MAX_FLOOR, HOPE_CAP]`. Hope follows
    /// a shrinking maximum down.
    pub fn set_hope_max(&mut self, hope_max: i32) -> ResourceChange {
        let before = self.hope_max;
        self.hope_max = hope_max.clamp(HOPE_MAX_FLOOR, HOPE_CAP);
        self.hope = self.hope.min(self.hope_max);
        ResourceChange::new(before, self.hope_max)
    }

    /// Mark Stress. Whatever exceeds the Stress maximum is taken from HP.
    pub fn gain_stress(&mut self, amount: i32) -> Result<StressGain, DomainError> {
        if amount < 0 {
            return Err(DomainError::validation(format!(
                "stress gain must be non-negative, got {amount}"
            )));
        }
        let stress_before = self.stress;
        let hp_before = self.hp;
        let raw = stress_before.saturating_add(amount);
        let overflow = (raw - self.stress_max).max(0);

        self.stress = raw.min(self.stress_max);
        self.hp = (self.hp - overflow).max(0);

        Ok(StressGain {
            stress: ResourceChange::new(stress_before, self.stress),
            hp: ResourceChange::new(hp_before, self.hp),
            overflow,
            filled_to_max: amount > 0 && self.stress == self.stress_max,
        })
    }
}

impl ResourceHolder for CharacterResources {
    type Kind = CharacterResource;

    fn resource_name(kind: Self::Kind) -> &'static str {
        kind.as_str()
    }

    fn current(&self, kind: Self::Kind) -> i32 {
        match kind {
            CharacterResource::Hp => self.hp,
            CharacterResource::Hope => self.hope,
            CharacterResource::Stress => self.stress,
            CharacterResource::Armor => self.armor,
        }
    }

    fn maximum(&self, kind: Self::Kind) -> i32 {
        match kind {
            CharacterResource::Hp => self.hp_max,
            CharacterResource::Hope => self.hope_max,
            CharacterResource::Stress => self.stress_max,
            CharacterResource::Armor => self.armor_max,
        }
    }

    fn store(&mut self, kind: Self::Kind, value: i32) {
        match kind {
            CharacterResource::Hp => self.hp = value,
            CharacterResource::Hope => self.hope = value,
            CharacterResource::Stress => self.stress = value,
            CharacterResource::Armor => self.armor = value,
        }
    }

    fn gain(&mut self, kind: Self::Kind, amount: i32) -> Result<ResourceChange, DomainError> {
        match kind {
            CharacterResource::Stress => self.gain_stress(amount).map(|gain| gain.stress),
            _ => gain_up_to_maximum(self, kind, amount),
        }
    }
}

// ============================================================================
// Campaign resources
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignResource {
    GmFear,
}

/// Campaign-wide pools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignResources {
    gm_fear: i32,
}

impl CampaignResources {
    pub fn new(gm_fear: i32) -> Self {
        Self {
            gm_fear: gm_fear.clamp(0, GM_FEAR_CAP),
        }
    }

    pub fn gm_fear(&self) -> i32 {
        self.gm_fear
    }
}

impl ResourceHolder for CampaignResources {
    type Kind = CampaignResource;

    fn resource_name(_kind: Self::Kind) -> &'static str {
        "gm_fear"
    }

    fn current(&self, _kind: Self::Kind) -> i32 {
        self.gm_fear
    }

    fn maximum(&self, _kind: Self::Kind) -> i32 {
        GM_FEAR_CAP
    }

    fn store(&mut self, _kind: Self::Kind, value: i32) {
        self.gm_fear = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> CharacterResources {
        CharacterResources::new()
            .with_maximums(10, 6, 3)
            .with_values(8, 2, 4, 1)
    }

    #[test]
    fn set_clamps_into_bounds() {
        let mut res = sheet();
        assert_eq!(res.set(CharacterResource::Hp, 40), ResourceChange::new(8, 10));
        assert_eq!(res.set(CharacterResource::Armor, -2), ResourceChange::new(1, 0));
        assert_eq!(res.get(CharacterResource::Hope), 2);
    }

    #[test]
    fn maximums_never_exceed_absolute_caps() {
        let res = CharacterResources::new().with_maximums(99, 99, 99);
        assert_eq!(res.hp_max(), HP_CAP);
        assert_eq!(res.stress_max(), STRESS_CAP);
        assert_eq!(res.armor_max(), ARMOR_CAP);
    }

    #[test]
    fn gain_stops_at_maximum() {
        let mut res = sheet();
        let change = res.gain(CharacterResource::Hope, 10).unwrap();
        assert_eq!(change, ResourceChange::new(2, 6));
    }

    #[test]
    fn spend_more_than_available_fails_without_mutation() {
        let mut res = sheet();
        let err = res.spend(CharacterResource::Hope, 3).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientResource {
                resource: "hope",
                needed: 3,
                available: 2
            }
        );
        assert_eq!(res.hope(), 2);
    }

    #[test]
    fn spend_reports_before_and_after() {
        let mut res = sheet();
        assert_eq!(
            res.spend(CharacterResource::Stress, 4).unwrap(),
            ResourceChange::new(4, 0)
        );
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut res = sheet();
        assert!(res.gain(CharacterResource::Hp, -1).is_err());
        assert!(res.spend(CharacterResource::Hp, -1).is_err());
    }

    #[test]
    fn character_and_campaign_gain_share_clamping() {
        let mut res = sheet();
        assert_eq!(
            res.gain(CharacterResource::Armor, 5).unwrap(),
            ResourceChange::new(1, 3)
        );
        let mut fear = CampaignResources::new(GM_FEAR_CAP - 1);
        assert_eq!(
            fear.gain(CampaignResource::GmFear, 4).unwrap(),
            ResourceChange::new(GM_FEAR_CAP - 1, GM_FEAR_CAP)
        );
        assert_eq!(
            res.gain(CharacterResource::Armor, -1).unwrap_err(),
            DomainError::validation("armor gain must be non-negative, got -1")
        );
        assert_eq!(
            fear.gain(CampaignResource::GmFear, -1).unwrap_err(),
            DomainError::validation("gm_fear gain must be non-negative, got -1")
        );
    }

    #[test]
    fn stress_overflow_spills_into_hp() {
        let mut res = sheet();
        let gain = res.gain_stress(5).unwrap();
        assert_eq!(gain.stress, ResourceChange::new(4, 6));
        assert_eq!(gain.overflow, 3);
        assert_eq!(gain.hp, ResourceChange::new(8, 5));
        assert!(gain.filled_to_max);
    }

    #[test]
    fn stress_gain_exactly_to_max_has_no_overflow() {
        let mut res = sheet();
        let gain = res.gain_stress(2).unwrap();
        assert_eq!(gain.overflow, 0);
        assert!(gain.filled_to_max);
        assert_eq!(res.hp(), 8);
    }

    #[test]
    fn stress_overflow_floors_hp_at_zero() {
        let mut res = sheet();
        res.gain_stress(20).unwrap();
        assert_eq!(res.hp(), 0);
        assert_eq!(res.stress(), 6);
    }

    #[test]
    fn trait_gain_on_stress_uses_overflow_rule() {
        let mut res = sheet();
        let change = res.gain(CharacterResource::Stress, 3).unwrap();
        assert_eq!(change, ResourceChange::new(4, 6));
        assert_eq!(res.hp(), 7);
    }

    #[test]
    fn shrinking_hope_max_reclamps_hope() {
        let mut res = CharacterResources::new().with_values(0, 5, 0, 0);
        res.set_hope_max(3);
        assert_eq!(res.hope(), 3);
        res.set_hope_max(-4);
        assert_eq!(res.hope_max(), HOPE_MAX_FLOOR);
        assert_eq!(res.hope(), 0);
    }

    #[test]
    fn gm_fear_is_capped() {
        let mut campaign = CampaignResources::new(11);
        let change = campaign.gain(CampaignResource::GmFear, 4).unwrap();
        assert_eq!(change, ResourceChange::new(11, GM_FEAR_CAP));
        assert!(campaign.spend(CampaignResource::GmFear, 13).is_err());
    }

    #[test]
    fn resource_names_parse() {
        assert_eq!("Stress".parse::<CharacterResource>().unwrap(), CharacterResource::Stress);
        assert!("mana".parse::<CharacterResource>().is_err());
    }
}
