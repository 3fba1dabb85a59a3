//! Rest resolution.
//!
//! Short rests can be chained up to [`SHORT_REST_CAP`] times; after that the
//! party must take a long rest. Every rest hands the GM Fear, a long rest
//! also ticks the campaign's long-term countdown. An interrupted long rest
//! counts as a short one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::countdown::{CountdownSpec, CountdownUpdate};
use super::dice::{roll_checked, DiceRoller, RollRequest, D4};
use super::resources::{CampaignResource, CampaignResources, ResourceHolder};
use super::GM_FEAR_CAP;
use crate::error::DomainError;

/// Consecutive short rests allowed before a long rest is required.
pub const SHORT_REST_CAP: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestType {
    Short,
    Long,
}

impl RestType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for RestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            other => Err(DomainError::parse(format!("Unknown rest type: {other}"))),
        }
    }
}

/// When a refresh effect comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshScope {
    /// Any rest.
    Rest,
    /// Long rests only.
    LongRest,
}

/// A once-per-rest feature that recharges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefreshEffect {
    pub id: String,
    pub scope: RefreshScope,
}

/// How long a temporary armor grant lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorDuration {
    ShortRest,
    LongRest,
}

impl ArmorDuration {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShortRest => "short_rest",
            Self::LongRest => "long_rest",
        }
    }

    /// Whether a grant of this duration falls off after a rest of `effective` type.
    pub fn expires_after(&self, effective: RestType) -> bool {
        match self {
            Self::ShortRest => true,
            Self::LongRest => effective == RestType::Long,
        }
    }
}

impl FromStr for ArmorDuration {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short_rest" => Ok(Self::ShortRest),
            "long_rest" => Ok(Self::LongRest),
            other => Err(DomainError::parse(format!("Unknown armor duration: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestInput {
    pub rest_type: RestType,
    pub interrupted: bool,
    pub consecutive_short_rests: i32,
    pub gm_fear: i32,
    /// Characters resting, added to the Fear gain on a long rest.
    pub party_size: i32,
    pub refresh_effects: Vec<RefreshEffect>,
    pub long_term_countdown: Option<CountdownSpec>,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestOutcome {
    pub requested: RestType,
    /// Rest type after interruption is taken into account.
    pub effective: RestType,
    pub interrupted: bool,
    pub short_rests_before: i32,
    pub short_rests_after: i32,
    pub fear_die: u8,
    pub gm_fear_before: i32,
    pub gm_fear_after: i32,
    pub refresh_rest: bool,
    pub refresh_long_rest: bool,
    pub refreshed: Vec<RefreshEffect>,
    pub countdown: Option<CountdownUpdate>,
}

impl RestOutcome {
    /// Whether temporary armor of this duration falls off after the rest.
    pub fn expires(&self, duration: ArmorDuration) -> bool {
        duration.expires_after(self.effective)
    }
}

/// Resolve a rest. The Fear die is rolled through `roller` with `input.seed`.
pub fn resolve_rest(input: RestInput, roller: &dyn DiceRoller) -> Result<RestOutcome, DomainError> {
    if input.consecutive_short_rests < 0 {
        return Err(DomainError::validation(
            "consecutive short rests must be non-negative",
        ));
    }
    if input.party_size < 0 {
        return Err(DomainError::validation("party size must be non-negative"));
    }
    super::ensure_range("gm_fear", input.gm_fear, 0, GM_FEAR_CAP)?;

    let effective = if input.interrupted {
        RestType::Short
    } else {
        input.rest_type
    };

    if effective == RestType::Short && input.consecutive_short_rests >= SHORT_REST_CAP {
        return Err(DomainError::ShortRestLimitReached {
            cap: SHORT_REST_CAP,
        });
    }

    let dice = roll_checked(roller, input.seed, RollRequest::new(D4, 1))?;
    let fear_die = dice[0];
    let gain = match effective {
        RestType::Short => i32::from(fear_die),
        RestType::Long => i32::from(fear_die) + input.party_size,
    };
    let mut campaign = CampaignResources::new(input.gm_fear);
    let fear = campaign.gain(CampaignResource::GmFear, gain)?;

    let (short_rests_after, refresh_long_rest) = match effective {
        RestType::Short => (input.consecutive_short_rests + 1, false),
        RestType::Long => (0, true),
    };

    let refreshed = input
        .refresh_effects
        .into_iter()
        .filter(|e| e.scope == RefreshScope::Rest || refresh_long_rest)
        .collect();

    let countdown = match (effective, input.long_term_countdown) {
        (RestType::Long, Some(spec)) => Some(spec.advance(1)?),
        _ => None,
    };

    Ok(RestOutcome {
        requested: input.rest_type,
        effective,
        interrupted: input.interrupted,
        short_rests_before: input.consecutive_short_rests,
        short_rests_after,
        fear_die,
        gm_fear_before: fear.before,
        gm_fear_after: fear.after,
        refresh_rest: true,
        refresh_long_rest,
        refreshed,
        countdown,
    })
}
