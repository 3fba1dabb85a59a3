//! Countdowns - bounded clocks for progress and consequences.
//!
//! A countdown holds a value in `[0, max]`. Updates either move it by a delta
//! or set it directly. A looping countdown that runs off one end re-enters
//! at the other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownKind {
    #[default]
    Progress,
    Consequence,
}

impl CountdownKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::Consequence => "consequence",
        }
    }
}

impl fmt::Display for CountdownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountdownKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "progress" => Ok(Self::Progress),
            "consequence" => Ok(Self::Consequence),
            other => Err(DomainError::parse(format!("Unknown countdown kind: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownDirection {
    #[default]
    Increase,
    Decrease,
}

impl CountdownDirection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }

    /// +1 or -1.
    pub const fn sign(&self) -> i32 {
        match self {
            Self::Increase => 1,
            Self::Decrease => -1,
        }
    }
}

impl fmt::Display for CountdownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountdownDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            other => Err(DomainError::parse(format!(
                "Unknown countdown direction: {other}"
            ))),
        }
    }
}

/// The numeric part of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownSpec {
    pub current: i32,
    pub max: i32,
    pub direction: CountdownDirection,
    pub looping: bool,
}

impl CountdownSpec {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max <= 0 {
            return Err(DomainError::validation(format!(
                "countdown max must be positive, got {}",
                self.max
            )));
        }
        if self.current < 0 || self.current > self.max {
            return Err(DomainError::validation(format!(
                "countdown current must be in range 0..={}, got {}",
                self.max, self.current
            )));
        }
        Ok(())
    }

    /// Move `steps` ticks in the countdown's own direction.
    pub fn advance(&self, steps: i32) -> Result<CountdownUpdate, DomainError> {
        apply_countdown_update(self, Some(steps.saturating_mul(self.direction.sign())), None)
    }
}

/// Result of a countdown update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownUpdate {
    pub before: i32,
    pub after: i32,
    /// Magnitude actually applied.
    pub delta: i32,
    pub looped: bool,
}

/// Apply a delta or an override to a countdown.
///
/// An override wins over a delta. Without an override the raw value is
/// clamped into `[0, max]`; a looping countdown that was clamped re-enters at
/// the opposite bound instead.
pub fn apply_countdown_update(
    countdown: &CountdownSpec,
    delta: Option<i32>,
    override_value: Option<i32>,
) -> Result<CountdownUpdate, DomainError> {
    countdown.validate()?;
    let current = countdown.current;

    if let Some(value) = override_value {
        if value < 0 || value > countdown.max {
            return Err(DomainError::validation(format!(
                "countdown override must be in range 0..={}, got {value}",
                countdown.max
            )));
        }
        return Ok(CountdownUpdate {
            before: current,
            after: value,
            delta: (value - current).abs(),
            looped: false,
        });
    }

    let delta = match delta {
        Some(d) if d != 0 => d,
        _ => return Err(DomainError::no_op("countdown update needs a delta or override")),
    };

    let raw = current.saturating_add(delta);
    let clamped = raw.clamp(0, countdown.max);
    let (after, looped) = if clamped != raw && countdown.looping {
        if raw < 0 {
            (countdown.max, true)
        } else {
            (0, true)
        }
    } else {
        (clamped, false)
    };

    Ok(CountdownUpdate {
        before: current,
        after,
        delta: (after - current).abs(),
        looped,
    })
}
