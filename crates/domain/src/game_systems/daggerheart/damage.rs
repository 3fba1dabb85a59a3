//! Damage resolution.
//!
//! Incoming damage is first adjusted for resistance and immunity, then sorted
//! into a severity tier by the target's thresholds. Each tier marks a fixed
//! number of HP. The target may spend one Armor slot to step the hit down a
//! single tier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Severity tier of a hit. Ordering follows the number of HP marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSeverity {
    None,
    Minor,
    Major,
    Severe,
    Massive,
}

impl DamageSeverity {
    /// HP marked by a hit of this tier.
    pub const fn marks(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::Minor => 1,
            Self::Major => 2,
            Self::Severe => 3,
            Self::Massive => 4,
        }
    }

    /// One tier lower, stopping at `None`.
    pub const fn step_down(self) -> Self {
        match self {
            Self::None | Self::Minor => Self::None,
            Self::Major => Self::Minor,
            Self::Severe => Self::Major,
            Self::Massive => Self::Severe,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Severe => "severe",
            Self::Massive => "massive",
        }
    }
}

impl fmt::Display for DamageSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DamageSeverity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            "severe" => Ok(Self::Severe),
            "massive" => Ok(Self::Massive),
            other => Err(DomainError::parse(format!("Unknown damage severity: {other}"))),
        }
    }
}

/// Severity tier and the HP marks it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    pub severity: DamageSeverity,
    pub marks: i32,
}

impl DamageResult {
    pub const NONE: DamageResult = DamageResult {
        severity: DamageSeverity::None,
        marks: 0,
    };

    pub const fn of(severity: DamageSeverity) -> Self {
        Self {
            severity,
            marks: severity.marks(),
        }
    }
}

/// Classify `amount` against the thresholds.
///
/// Massive damage (at least twice the severe threshold) is an optional rule.
pub fn evaluate_damage(
    amount: i32,
    major_threshold: i32,
    severe_threshold: i32,
    massive_enabled: bool,
) -> Result<DamageResult, DomainError> {
    if major_threshold < 0 || severe_threshold < major_threshold {
        return Err(DomainError::InvalidThresholds {
            major: major_threshold,
            severe: severe_threshold,
        });
    }
    if amount <= 0 {
        return Ok(DamageResult::NONE);
    }

    let severity = if massive_enabled && amount >= severe_threshold.saturating_mul(2) {
        DamageSeverity::Massive
    } else if amount >= severe_threshold {
        DamageSeverity::Severe
    } else if amount >= major_threshold {
        DamageSeverity::Major
    } else {
        DamageSeverity::Minor
    };
    Ok(DamageResult::of(severity))
}

/// Spend at most one Armor slot to drop the hit one tier.
///
/// Returns the reduced result and the number of slots spent (0 or 1).
pub fn reduce_damage_with_armor(result: DamageResult, available_slots: i32) -> (DamageResult, i32) {
    if available_slots <= 0 || result.marks <= 0 {
        return (result, 0);
    }
    let reduced = DamageResult {
        severity: result.severity.step_down(),
        marks: (result.marks - 1).max(0),
    };
    (reduced, 1)
}

/// HP left after marking. Never negative.
pub fn apply_damage_marks(hp: i32, marks: i32) -> i32 {
    (hp - marks.max(0)).max(0)
}

/// Which damage types an attack carries. Both set means mixed damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageTypes {
    #[serde(default)]
    pub physical: bool,
    #[serde(default)]
    pub magic: bool,
}

impl DamageTypes {
    pub const PHYSICAL: DamageTypes = DamageTypes {
        physical: true,
        magic: false,
    };
    pub const MAGIC: DamageTypes = DamageTypes {
        physical: false,
        magic: true,
    };
    pub const MIXED: DamageTypes = DamageTypes {
        physical: true,
        magic: true,
    };

    pub const fn is_mixed(&self) -> bool {
        self.physical && self.magic
    }
}

/// Resistances and immunities of the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResistanceProfile {
    #[serde(default)]
    pub resist_physical: bool,
    #[serde(default)]
    pub resist_magic: bool,
    #[serde(default)]
    pub immune_physical: bool,
    #[serde(default)]
    pub immune_magic: bool,
}

/// Adjust raw damage for the target's resistances.
///
/// A mixed attack is only halved (or ignored) when the target resists (or is
/// immune to) both types. Halving rounds down.
pub fn apply_resistance(amount: i32, types: DamageTypes, profile: ResistanceProfile) -> i32 {
    if amount <= 0 {
        return 0;
    }

    let (immune, resist) = match (types.physical, types.magic) {
        (true, true) => (
            profile.immune_physical && profile.immune_magic,
            profile.resist_physical && profile.resist_magic,
        ),
        (true, false) => (profile.immune_physical, profile.resist_physical),
        (false, true) => (profile.immune_magic, profile.resist_magic),
        (false, false) => (false, false),
    };

    if immune {
        0
    } else if resist {
        amount / 2
    } else {
        amount
    }
}

/// Everything needed to resolve one hit against one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRequest {
    pub amount: i32,
    pub types: DamageTypes,
    pub resistance: ResistanceProfile,
    pub major_threshold: i32,
    pub severe_threshold: i32,
    pub hp: i32,
    pub armor: i32,
    /// The target chose to mark an Armor slot.
    pub use_armor: bool,
    pub massive_enabled: bool,
}

/// Outcome of the full damage pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResolution {
    pub raw_amount: i32,
    /// Amount after resistance and immunity.
    pub amount: i32,
    /// Result before armor.
    pub evaluated: DamageResult,
    /// Result after armor.
    pub result: DamageResult,
    pub hp_before: i32,
    pub hp_after: i32,
    pub armor_before: i32,
    pub armor_after: i32,
    pub armor_spent: i32,
}

impl DamageResolution {
    /// Resistance or armor lowered the outcome.
    pub fn mitigated(&self) -> bool {
        self.armor_spent > 0 || self.amount < self.raw_amount
    }
}

/// Resistance, then thresholds, then armor, then HP marks.
pub fn resolve_damage(request: DamageRequest) -> Result<DamageResolution, DomainError> {
    if request.hp < 0 {
        return Err(DomainError::validation(format!(
            "hp must be non-negative, got {}",
            request.hp
        )));
    }
    if request.armor < 0 {
        return Err(DomainError::validation(format!(
            "armor must be non-negative, got {}",
            request.armor
        )));
    }

    let amount = apply_resistance(request.amount, request.types, request.resistance);
    let evaluated = evaluate_damage(
        amount,
        request.major_threshold,
        request.severe_threshold,
        request.massive_enabled,
    )?;

    let slots = if request.use_armor { request.armor } else { 0 };
    let (result, armor_spent) = reduce_damage_with_armor(evaluated, slots);

    Ok(DamageResolution {
        raw_amount: request.amount,
        amount,
        evaluated,
        result,
        hp_before: request.hp,
        hp_after: apply_damage_marks(request.hp, result.marks),
        armor_before: request.armor,
        armor_after: request.armor - armor_spent,
        armor_spent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_tiers() {
        let eval = |amount| evaluate_damage(amount, 5, 10, true).unwrap();
        assert_eq!(eval(0), DamageResult::NONE);
        assert_eq!(eval(-3), DamageResult::NONE);
        assert_eq!(eval(4), DamageResult::of(DamageSeverity::Minor));
        assert_eq!(eval(5), DamageResult::of(DamageSeverity::Major));
        assert_eq!(eval(10), DamageResult::of(DamageSeverity::Severe));
        assert_eq!(eval(20).marks, 4);
    }

    #[test]
    fn massive_requires_the_optional_rule() {
        let result = evaluate_damage(25, 5, 10, false).unwrap();
        assert_eq!(result.severity, DamageSeverity::Severe);
        assert_eq!(result.marks, 3);
    }

    #[test]
    fn thresholds_must_be_ordered() {
        assert_eq!(
            evaluate_damage(5, 8, 4, true).unwrap_err(),
            DomainError::InvalidThresholds { major: 8, severe: 4 }
        );
        assert!(evaluate_damage(5, -1, 4, true).is_err());
    }

    #[test]
    fn severity_never_decreases_as_amount_grows() {
        for major in 0..8 {
            for severe in major..16 {
                for massive in [true, false] {
                    let mut prev = DamageSeverity::None;
                    for amount in -2..40 {
                        let result = evaluate_damage(amount, major, severe, massive).unwrap();
                        assert!(result.severity >= prev);
                        assert!((0..=4).contains(&result.marks));
                        prev = result.severity;
                    }
                }
            }
        }
    }

    #[test]
    fn armor_steps_down_exactly_one_tier() {
        let (reduced, spent) = reduce_damage_with_armor(DamageResult::of(DamageSeverity::Severe), 1);
        assert_eq!(reduced, DamageResult::of(DamageSeverity::Major));
        assert_eq!(spent, 1);

        let (reduced, spent) = reduce_damage_with_armor(DamageResult::of(DamageSeverity::Severe), 6);
        assert_eq!(reduced.marks, 2);
        assert_eq!(spent, 1);
    }

    #[test]
    fn armor_without_slots_or_marks_is_a_no_op() {
        let severe = DamageResult::of(DamageSeverity::Severe);
        assert_eq!(reduce_damage_with_armor(severe, 0), (severe, 0));
        assert_eq!(
            reduce_damage_with_armor(DamageResult::NONE, 3),
            (DamageResult::NONE, 0)
        );
    }

    #[test]
    fn armor_on_minor_hit_reaches_none() {
        let (reduced, _) = reduce_damage_with_armor(DamageResult::of(DamageSeverity::Minor), 1);
        assert_eq!(reduced, DamageResult::NONE);
    }

    #[test]
    fn marks_floor_hp_at_zero() {
        assert_eq!(apply_damage_marks(5, 2), 3);
        assert_eq!(apply_damage_marks(1, 4), 0);
        assert_eq!(apply_damage_marks(3, -1), 3);
    }

    #[test]
    fn mixed_attack_needs_both_resistances() {
        let one = ResistanceProfile {
            resist_physical: true,
            ..Default::default()
        };
        assert_eq!(apply_resistance(9, DamageTypes::MIXED, one), 9);

        let both = ResistanceProfile {
            resist_physical: true,
            resist_magic: true,
            ..Default::default()
        };
        assert_eq!(apply_resistance(9, DamageTypes::MIXED, both), 4);
    }

    #[test]
    fn mixed_attack_needs_both_immunities() {
        let one = ResistanceProfile {
            immune_magic: true,
            ..Default::default()
        };
        assert_eq!(apply_resistance(6, DamageTypes::MIXED, one), 6);

        let both = ResistanceProfile {
            immune_physical: true,
            immune_magic: true,
            ..Default::default()
        };
        assert_eq!(apply_resistance(6, DamageTypes::MIXED, both), 0);
    }

    #[test]
    fn single_type_uses_its_own_flags() {
        let profile = ResistanceProfile {
            resist_physical: true,
            immune_magic: true,
            ..Default::default()
        };
        assert_eq!(apply_resistance(7, DamageTypes::PHYSICAL, profile), 3);
        assert_eq!(apply_resistance(7, DamageTypes::MAGIC, profile), 0);
        assert_eq!(apply_resistance(-1, DamageTypes::PHYSICAL, profile), 0);
    }

    #[test]
    fn pipeline_applies_resistance_before_thresholds() {
        let resolution = resolve_damage(DamageRequest {
            amount: 12,
            types: DamageTypes::PHYSICAL,
            resistance: ResistanceProfile {
                resist_physical: true,
                ..Default::default()
            },
            major_threshold: 5,
            severe_threshold: 10,
            hp: 6,
            armor: 2,
            use_armor: true,
            massive_enabled: true,
        })
        .unwrap();

        assert_eq!(resolution.amount, 6);
        assert_eq!(resolution.evaluated.severity, DamageSeverity::Major);
        assert_eq!(resolution.result.severity, DamageSeverity::Minor);
        assert_eq!(resolution.hp_after, 5);
        assert_eq!(resolution.armor_after, 1);
        assert!(resolution.mitigated());
    }

    #[test]
    fn pipeline_without_armor_marks_full_tier() {
        let resolution = resolve_damage(DamageRequest {
            amount: 10,
            types: DamageTypes::MAGIC,
            resistance: ResistanceProfile::default(),
            major_threshold: 5,
            severe_threshold: 10,
            hp: 6,
            armor: 2,
            use_armor: false,
            massive_enabled: true,
        })
        .unwrap();

        assert_eq!(resolution.result.marks, 3);
        assert_eq!(resolution.hp_after, 3);
        assert_eq!(resolution.armor_spent, 0);
        assert!(!resolution.mitigated());
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("Severe".parse::<DamageSeverity>().unwrap(), DamageSeverity::Severe);
        assert!("deadly".parse::<DamageSeverity>().is_err());
    }
}
